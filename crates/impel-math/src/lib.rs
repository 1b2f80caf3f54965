// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! impel-math: deterministic numeric lanes for the impel simulation core.
//!
//! Everything in the engine is written against the [`Scalar`] trait so the
//! same world can run on the canonicalizing float lane ([`F32Scalar`]) or on
//! the Q32.32 fixed-point lane ([`DFix64`]). [`Vec2`] is the only vector type
//! the engine needs; [`Prng`] drives reproducible scenario setup.
#![forbid(unsafe_code)]

pub mod fixed_q32_32;
mod prng;
pub mod scalar;
mod vec2;

pub use prng::Prng;
pub use scalar::{DFix64, F32Scalar, Scalar};
pub use vec2::Vec2;

/// Degeneracy threshold used when normalizing vectors.
///
/// Vectors whose length is at or below this value have no usable direction.
pub const EPSILON: f32 = 1e-6;
