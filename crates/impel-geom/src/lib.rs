// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Geometry layer for impel.

This crate provides:
- Value handles for bodies, colliders and shapes, and the symmetric
  `ColliderPair` key.
- Axis-aligned boxes (`Aabb`), circles (`Circle`) and planes (`Plane`).
- Exact intersection predicates between boxes and circles.
- The `BroadPhase` contract plus two implementations: a loose `QuadTree`
  and the `AllPairs` baseline.

Design notes:
- Generic over `impel_math::Scalar`, so the float and fixed-point lanes share
  every routine.
- Deterministic: no ambient RNG, no hash-order dependence; pair output order
  depends only on insertion order.
- Overlap is inclusive on faces (touching boxes are candidates).
"]

/// Broad-phase contract and implementations.
pub mod broad;
/// Stable value handles and the symmetric collider pair.
pub mod ident;
/// Exact pairwise intersection predicates.
pub mod intersect;
/// Foundational shape types.
pub mod types;

pub use broad::all_pairs::AllPairs;
pub use broad::quadtree::{QuadNode, QuadTree, QuadTreeConfig, QuadTreeConfigError};
pub use broad::{BroadPhase, ColliderAabb};
pub use intersect::Penetration;
pub use ident::{BodyHandle, ColliderHandle, ColliderPair, ShapeHandle};
pub use types::aabb::Aabb;
pub use types::circle::Circle;
pub use types::plane::Plane;
