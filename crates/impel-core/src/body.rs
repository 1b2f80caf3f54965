// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::{Scalar, Vec2};

/// How a body takes part in integration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum BodyKind {
    /// Integrates gravity and accumulated force.
    #[default]
    Dynamic,
    /// Moves with its velocity; ignores force, gravity and contacts.
    Kinematic,
    /// Never moves.
    Static,
    /// Slot released; kept only so indices stay stable.
    Removed,
}

impl BodyKind {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Dynamic => 0,
            Self::Kinematic => 1,
            Self::Static => 2,
            Self::Removed => 3,
        }
    }
}

/// Point-mass rigid body.
///
/// An `inverse_mass` of zero marks an immovable body: it receives no gravity,
/// force or impulse even when `Dynamic`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Body<S> {
    /// World-space position in metres.
    pub position: Vec2<S>,
    /// Linear velocity in metres per second.
    pub velocity: Vec2<S>,
    /// Force accumulated since the last step; cleared by integration.
    pub force: Vec2<S>,
    /// Reciprocal of mass.
    pub inverse_mass: S,
    /// Integration mode.
    pub kind: BodyKind,
    /// Inactive bodies are neither integrated nor tested for contact.
    pub active: bool,
}

impl<S: Scalar> Default for Body<S> {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            force: Vec2::zero(),
            inverse_mass: S::one(),
            kind: BodyKind::Dynamic,
            active: true,
        }
    }
}

impl<S: Scalar> Body<S> {
    pub(crate) fn removed() -> Self {
        Self { kind: BodyKind::Removed, active: false, ..Self::default() }
    }

    /// `true` for active bodies that have not been removed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.active && self.kind != BodyKind::Removed
    }

    /// Mass, or `None` for an immovable body.
    #[must_use]
    pub fn mass(&self) -> Option<S> {
        if self.inverse_mass == S::zero() {
            None
        } else {
            Some(S::one() / self.inverse_mass)
        }
    }

    /// Sets the mass; zero or negative makes the body immovable.
    pub fn set_mass(&mut self, mass: S) {
        self.inverse_mass = if mass > S::zero() { S::one() / mass } else { S::zero() };
    }

    /// Adds `force` to the accumulator.
    pub fn apply_force(&mut self, force: Vec2<S>) {
        self.force += force;
    }

    /// Inverse mass as seen by the contact resolver: zero unless `Dynamic`.
    #[must_use]
    pub fn effective_inverse_mass(&self) -> S {
        if self.kind == BodyKind::Dynamic {
            self.inverse_mass
        } else {
            S::zero()
        }
    }

    /// Advances one step.
    ///
    /// Dynamic bodies turn gravity into a weight force, add it to the
    /// accumulator, and integrate semi-implicitly: velocity first, then
    /// position from the new velocity. Kinematic bodies only translate.
    pub(crate) fn integrate(&mut self, gravity: Vec2<S>, dt: S) -> bool {
        if !self.active {
            return false;
        }
        match self.kind {
            BodyKind::Dynamic => {
                if self.inverse_mass != S::zero() {
                    self.force += gravity / self.inverse_mass;
                    self.velocity += self.force * (self.inverse_mass * dt);
                }
                self.position += self.velocity * dt;
                self.force = Vec2::zero();
                true
            }
            BodyKind::Kinematic => {
                self.position += self.velocity * dt;
                true
            }
            BodyKind::Static | BodyKind::Removed => false,
        }
    }
}
