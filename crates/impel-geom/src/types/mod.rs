// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Foundational geometry types used by the broad phase and the narrow phase.

/// Axis-aligned bounding boxes.
pub mod aabb;
/// Circles.
pub mod circle;
/// Half-plane normals.
pub mod plane;
