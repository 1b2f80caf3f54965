// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_geom::{BodyHandle, ColliderHandle};
use impel_math::{Scalar, Vec2};

use crate::body::{Body, BodyKind};

/// One solid contact, rebuilt every step a pair intersects.
///
/// `normal` points from `bodies[1]` toward `bodies[0]`: moving body 0 along
/// the normal (or body 1 against it) separates the pair.
#[derive(Debug, Copy, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Contact<S> {
    /// Bodies in contact.
    pub bodies: [BodyHandle; 2],
    /// Colliders in contact, in the same order as `bodies`.
    pub colliders: [ColliderHandle; 2],
    /// Unit separation direction.
    pub normal: Vec2<S>,
    /// World-space contact point.
    pub point: Vec2<S>,
    /// Larger of the two colliders' restitution.
    pub restitution: S,
    /// Overlap depth along `normal`; positive means overlapping.
    pub penetration: S,
}

/// What [`Contact::resolve`] changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// An impulse was applied.
    pub impulse: bool,
    /// Positions were corrected.
    pub correction: bool,
}

impl<S: Scalar> Contact<S> {
    /// Applies the contact to the two bodies it names.
    ///
    /// `first` and `second` must be the bodies for `self.bodies[0]` and
    /// `self.bodies[1]`. When the first body is `Static` the sides are swapped
    /// and the normal flipped, so the movable side always comes first.
    ///
    /// 1. Velocity: if the bodies approach along the normal, an impulse sets
    ///    the separating speed to `-restitution` times the approach speed.
    /// 2. Position: positive penetration is removed by moving each side along
    ///    the normal in proportion to its inverse mass.
    ///
    /// Only `Dynamic` sides are mutated; a pair with no mobile side is left
    /// untouched.
    pub fn resolve(&self, first: &mut Body<S>, second: &mut Body<S>) -> Resolution {
        let (a, b, normal) = if first.kind == BodyKind::Static {
            (second, first, -self.normal)
        } else {
            (first, second, self.normal)
        };

        let im_a = a.effective_inverse_mass();
        let im_b = b.effective_inverse_mass();
        let total = im_a + im_b;
        if total <= S::zero() {
            return Resolution::default();
        }

        let mut outcome = Resolution::default();
        let separating = (a.velocity - b.velocity).dot(normal);
        if separating < S::zero() {
            let target = -separating * self.restitution;
            let impulse = (target - separating) / total;
            let step = normal * impulse;
            if a.kind == BodyKind::Dynamic {
                a.velocity += step * im_a;
            }
            if b.kind == BodyKind::Dynamic {
                b.velocity -= step * im_b;
            }
            outcome.impulse = true;
        }

        if self.penetration > S::zero() {
            let push = normal * (self.penetration / total);
            if a.kind == BodyKind::Dynamic {
                a.position += push * im_a;
            }
            if b.kind == BodyKind::Dynamic {
                b.position -= push * im_b;
            }
            outcome.correction = true;
        }
        outcome
    }
}
