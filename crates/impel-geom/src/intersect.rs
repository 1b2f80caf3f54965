// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact pairwise tests between boxes and circles.
//!
//! Every routine that reports a [`Penetration`] orients the normal from the
//! second argument toward the first, so pushing the first shape along the
//! normal separates the two.

use impel_math::{Scalar, Vec2};

use crate::types::aabb::Aabb;
use crate::types::circle::Circle;

/// Overlap geometry for one intersecting pair.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Penetration<S> {
    /// Unit normal pointing from the second shape toward the first.
    pub normal: Vec2<S>,
    /// Representative contact point in world space.
    pub point: Vec2<S>,
    /// Overlap depth along `normal`; positive means overlapping.
    pub depth: S,
}

/// Box against box. Touching faces count as intersecting with zero depth.
///
/// The separating axis of least overlap wins; equal overlap on both axes
/// resolves along X. The contact point is the midpoint between the centres.
#[must_use]
pub fn box_box<S: Scalar>(a: &Aabb<S>, b: &Aabb<S>) -> Option<Penetration<S>> {
    if !a.overlaps(b) {
        return None;
    }
    let delta = a.center() - b.center();
    let ha = a.half_extents();
    let hb = b.half_extents();
    let overlap_x = ha.x + hb.x - delta.x.abs();
    let overlap_y = ha.y + hb.y - delta.y.abs();
    let (normal, depth) = if overlap_x <= overlap_y {
        (Vec2::new(sign(delta.x), S::zero()), overlap_x)
    } else {
        (Vec2::new(S::zero(), sign(delta.y)), overlap_y)
    };
    let point = (a.center() + b.center()) * S::half();
    Some(Penetration { normal, point, depth })
}

/// Box against circle, with the normal pointing from the circle into the box.
///
/// The contact point is the point of the box closest to the circle centre.
/// When that point coincides with the centre (the centre lies inside the box)
/// the circle is treated as sitting on top: the normal falls back to `down`.
#[must_use]
pub fn box_circle<S: Scalar>(b: &Aabb<S>, c: &Circle<S>) -> Option<Penetration<S>> {
    let closest = b.closest_point(c.center);
    let offset = c.center - closest;
    if offset.length_squared() > c.radius * c.radius {
        return None;
    }
    let distance = offset.length();
    Some(Penetration {
        normal: (-offset).normalize_or(Vec2::down()),
        point: closest,
        depth: c.radius - distance,
    })
}

/// Circle against circle. Tangent circles do not intersect.
///
/// Coincident centres resolve along `up`.
#[must_use]
pub fn circle_circle<S: Scalar>(a: &Circle<S>, b: &Circle<S>) -> Option<Penetration<S>> {
    let delta = a.center - b.center;
    let reach = a.radius + b.radius;
    if delta.length_squared() >= reach * reach {
        return None;
    }
    let distance = delta.length();
    Some(Penetration {
        normal: delta.normalize_or(Vec2::up()),
        point: (a.center + b.center) * S::half(),
        depth: reach - distance,
    })
}

fn sign<S: Scalar>(v: S) -> S {
    if v < S::zero() {
        -S::one()
    } else {
        S::one()
    }
}
