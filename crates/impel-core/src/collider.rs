// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

use impel_geom::{Aabb, BodyHandle, Circle, ColliderHandle, ShapeHandle};
use impel_math::{Scalar, Vec2};

/// Which shape store a collider's payload lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ShapeKind {
    /// Axis-aligned box; payload is a [`BoxShape`].
    Box,
    /// Circle; payload is a [`CircleShape`].
    Circle,
    /// Plane; payload is an [`impel_geom::Plane`].
    Plane,
    /// Slot released.
    #[default]
    None,
}

impl ShapeKind {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Box => 0,
            Self::Circle => 1,
            Self::Plane => 2,
            Self::None => 3,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Box => "box",
            Self::Circle => "circle",
            Self::Plane => "plane",
            Self::None => "none",
        })
    }
}

/// Shape attachment on a body.
///
/// New colliders are triggers with restitution `1`; clear `is_trigger` to get
/// physical contact response.
#[derive(Debug, Copy, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Collider<S> {
    /// Offset of the shape centre from the body position.
    pub offset: Vec2<S>,
    /// Owning body.
    pub body: BodyHandle,
    /// This collider's own handle.
    pub handle: ColliderHandle,
    /// Payload index inside the store selected by `kind`.
    pub shape: ShapeHandle,
    /// Bounciness in `[0, 1]`; a contact uses the larger of the two values.
    pub restitution: S,
    /// Triggers report overlap but receive no contact response.
    pub is_trigger: bool,
    /// Payload store selector.
    pub kind: ShapeKind,
    /// Opaque caller tag, carried but never interpreted.
    pub user_data: u64,
}

impl<S: Scalar> Collider<S> {
    pub(crate) fn new(body: BodyHandle, handle: ColliderHandle, shape: ShapeHandle, kind: ShapeKind) -> Self {
        Self {
            offset: Vec2::zero(),
            body,
            handle,
            shape,
            restitution: S::one(),
            is_trigger: true,
            kind,
            user_data: 0,
        }
    }

    pub(crate) fn removed() -> Self {
        Self::new(BodyHandle::INVALID, ColliderHandle::INVALID, ShapeHandle::INVALID, ShapeKind::None)
    }
}

/// Box payload.
#[derive(Debug, Copy, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BoxShape<S> {
    /// Half the box size on each axis. Negative components mark an unset box.
    pub half_extents: Vec2<S>,
}

impl<S: Scalar> BoxShape<S> {
    /// Payload of a freshly allocated or released box.
    #[must_use]
    pub fn unset() -> Self {
        Self { half_extents: Vec2::splat(-S::one()) }
    }

    /// Box with the given half-extents.
    #[must_use]
    pub const fn new(half_extents: Vec2<S>) -> Self {
        Self { half_extents }
    }

    /// `true` while either half-extent is negative.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.half_extents.x < S::zero() || self.half_extents.y < S::zero()
    }

    /// World-space bounds for a box centred at `center`.
    #[must_use]
    pub fn aabb(&self, center: Vec2<S>) -> Aabb<S> {
        Aabb::from_center(center, self.half_extents)
    }
}

/// Circle payload.
#[derive(Debug, Copy, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CircleShape<S> {
    /// Radius. Negative marks an unset circle.
    pub radius: S,
}

impl<S: Scalar> CircleShape<S> {
    /// Payload of a freshly allocated or released circle.
    #[must_use]
    pub fn unset() -> Self {
        Self { radius: -S::one() }
    }

    /// Circle with the given radius.
    #[must_use]
    pub const fn new(radius: S) -> Self {
        Self { radius }
    }

    /// `true` while the radius is negative.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.radius < S::zero()
    }

    /// World-space circle centred at `center`.
    #[must_use]
    pub const fn at(&self, center: Vec2<S>) -> Circle<S> {
        Circle::new(center, self.radius)
    }
}
