// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_geom::{BodyHandle, ColliderHandle, ShapeHandle};
use thiserror::Error;

use crate::collider::ShapeKind;

/// Errors reported by [`crate::World`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// Handle is out of range or names a removed body.
    #[error("no live body for {0}")]
    InvalidBody(BodyHandle),
    /// Handle is out of range or names a removed collider.
    #[error("no live collider for {0}")]
    InvalidCollider(ColliderHandle),
    /// Handle is out of range for the requested shape store.
    #[error("no live {kind} shape for {shape}")]
    InvalidShape {
        /// Store that was searched.
        kind: ShapeKind,
        /// Offending handle.
        shape: ShapeHandle,
    },
    /// The collider exists but carries a different shape.
    #[error("{collider} is a {found} collider, not a {expected} collider")]
    ShapeMismatch {
        /// Collider that was addressed.
        collider: ColliderHandle,
        /// Kind the caller asked for.
        expected: ShapeKind,
        /// Kind the collider actually has.
        found: ShapeKind,
    },
    /// Timestep is negative or not finite.
    #[error("invalid timestep {0}; expected a finite, non-negative value")]
    InvalidStep(f32),
}
