// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! impel-core: deterministic fixed-step 2D rigid-body simulation.
//!
//! A [`World`] owns bodies, colliders and shape payloads in slot arenas and
//! advances them with [`World::step`]:
//!
//! 1. Active dynamic bodies integrate gravity and accumulated force; kinematic
//!    bodies translate by their velocity.
//! 2. A caller-owned [`BroadPhase`](impel_geom::BroadPhase) is rebuilt from
//!    the current collider bounds and asked for candidate pairs.
//! 3. The narrow phase tests candidates exactly, reports enter/exit
//!    transitions to a caller-owned [`ContactListener`], and resolves solid
//!    contacts with an impulse plus positional correction.
//!
//! The world is generic over [`impel_math::Scalar`]: `World<F32Scalar>` (the
//! default) for canonical float math, `World<DFix64>` for Q32.32 fixed point.
//! Each lane replays bit-identically for identical inputs; the two lanes do
//! not match each other. [`World::state_hash`] summarises a lane's state.
#![forbid(unsafe_code)]

mod arena;
/// Bodies and their integration mode.
pub mod body;
/// Colliders and shape payloads.
pub mod collider;
pub mod config;
/// Contacts and the impulse resolver.
pub mod contact;
mod digest;
mod error;
/// Contact listener contract and the event recorder.
pub mod listener;
mod narrowphase;
mod world;

pub use body::{Body, BodyKind};
pub use collider::{BoxShape, CircleShape, Collider, ShapeKind};
pub use config::{ConfigError, SimConfig, WorldConfig};
pub use contact::{Contact, Resolution};
pub use error::PhysicsError;
pub use listener::{ContactEvent, ContactListener, EventLog};
pub use world::{StepReport, World};

pub use impel_geom::{
    Aabb, AllPairs, BodyHandle, BroadPhase, ColliderHandle, ColliderPair, Plane, QuadTree, QuadTreeConfig,
    ShapeHandle,
};
pub use impel_math::{DFix64, F32Scalar, Scalar, Vec2};
