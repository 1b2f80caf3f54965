// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded fixtures shared by the impel benchmarks.
#![forbid(unsafe_code)]

use impel_core::{BodyKind, PhysicsError, Scalar, Vec2, World};
use impel_geom::{Aabb, ColliderAabb, ColliderHandle};
use impel_math::Prng;

/// Side length of the square the fixtures scatter into.
pub const FIELD: f32 = 100.0;

/// `n` random boxes in `[-FIELD/2, FIELD/2]²` with half-extents up to 1.5.
pub fn scattered_boxes<S: Scalar>(n: usize, seed: u64) -> Vec<ColliderAabb<S>> {
    let mut rng = Prng::from_seed_u64(seed);
    let half = FIELD * 0.5;
    (0..n)
        .map(|i| {
            let center = Vec2::from_f32(rng.next_range(-half, half), rng.next_range(-half, half));
            let extent = Vec2::from_f32(rng.next_range(0.1, 1.5), rng.next_range(0.1, 1.5));
            ColliderAabb::new(ColliderHandle::from_index(i), Aabb::from_center(center, extent))
        })
        .collect()
}

/// A walled arena with `n` dynamic circles moving in random directions.
///
/// # Errors
/// Propagates handle errors from the world; none occur for a fresh world.
pub fn arena<S: Scalar>(n: usize, seed: u64) -> Result<World<S>, PhysicsError> {
    let mut world = World::default();
    world.set_gravity(Vec2::zero());
    let half = FIELD * 0.5;
    for (x, y, hx, hy) in [(0.0, -half, half, 1.0), (0.0, half, half, 1.0), (-half, 0.0, 1.0, half), (half, 0.0, 1.0, half)] {
        let wall = world.add_body();
        let body = world.body_mut(wall)?;
        body.kind = BodyKind::Static;
        body.position = Vec2::from_f32(x, y);
        let collider = world.add_box_collider(wall)?;
        world.set_box_half_extents(collider, Vec2::from_f32(hx, hy))?;
        world.collider_mut(collider)?.is_trigger = false;
    }
    let mut rng = Prng::from_seed_u64(seed);
    let span = half - 3.0;
    for _ in 0..n {
        let handle = world.add_body();
        let body = world.body_mut(handle)?;
        body.position = Vec2::from_f32(rng.next_range(-span, span), rng.next_range(-span, span));
        body.velocity = Vec2::from_f32(rng.next_range(-5.0, 5.0), rng.next_range(-5.0, 5.0));
        let collider = world.add_circle_collider(handle)?;
        world.set_circle_radius(collider, S::from_f32(rng.next_range(0.3, 1.0)))?;
        world.collider_mut(collider)?.is_trigger = false;
    }
    Ok(world)
}
