// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Built-in scenes.

use anyhow::Result;
use clap::ValueEnum;
use impel_core::{BodyHandle, BodyKind, ColliderHandle, Scalar, SimConfig, Vec2, World};
use impel_math::Prng;
use serde::Serialize;
use tracing::info;

/// Scene to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Static floor with a falling circle and a falling box.
    Ground,
    /// Solid circles and boxes bouncing inside a walled arena.
    Collisions,
    /// Moving trigger circles crossing static trigger zones.
    Triggers,
}

/// Knobs shared by every scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneParams {
    /// Number of spawned movers for the random scenes.
    pub count: usize,
    /// Seed for the random scenes.
    pub seed: u64,
}

struct Builder<'w, S: Scalar> {
    world: &'w mut World<S>,
}

impl<S: Scalar> Builder<'_, S> {
    fn body(&mut self, kind: BodyKind, x: f32, y: f32) -> Result<BodyHandle> {
        let handle = self.world.add_body();
        let body = self.world.body_mut(handle)?;
        body.kind = kind;
        body.position = Vec2::from_f32(x, y);
        Ok(handle)
    }

    fn solid(&mut self, collider: ColliderHandle, restitution: f32) -> Result<ColliderHandle> {
        let c = self.world.collider_mut(collider)?;
        c.is_trigger = false;
        c.restitution = S::from_f32(restitution);
        Ok(collider)
    }

    fn boxed(&mut self, body: BodyHandle, hx: f32, hy: f32) -> Result<ColliderHandle> {
        let collider = self.world.add_box_collider(body)?;
        self.world.set_box_half_extents(collider, Vec2::from_f32(hx, hy))?;
        Ok(collider)
    }

    fn circle(&mut self, body: BodyHandle, radius: f32) -> Result<ColliderHandle> {
        let collider = self.world.add_circle_collider(body)?;
        self.world.set_circle_radius(collider, S::from_f32(radius))?;
        Ok(collider)
    }

    fn velocity(&mut self, body: BodyHandle, vx: f32, vy: f32) -> Result<()> {
        self.world.body_mut(body)?.velocity = Vec2::from_f32(vx, vy);
        Ok(())
    }
}

/// Builds `scenario` into a fresh world.
pub fn build<S: Scalar>(scenario: Scenario, config: &SimConfig, params: SceneParams) -> Result<World<S>> {
    let mut world = World::new(&config.world)?;
    let mut b = Builder { world: &mut world };
    match scenario {
        Scenario::Ground => ground(&mut b)?,
        Scenario::Collisions => collisions(&mut b, params)?,
        Scenario::Triggers => triggers(&mut b, params)?,
    }
    info!(?scenario, bodies = world.body_count(), colliders = world.collider_count(), "scene built");
    Ok(world)
}

fn ground<S: Scalar>(b: &mut Builder<'_, S>) -> Result<()> {
    let floor = b.body(BodyKind::Static, 0.0, -5.0)?;
    let slab = b.boxed(floor, 20.0, 1.0)?;
    b.solid(slab, 0.2)?;
    let plane = b.world.add_plane_collider(floor)?;
    b.world.set_plane_normal(plane, Vec2::up())?;

    let ball = b.body(BodyKind::Dynamic, -2.0, 5.0)?;
    let round = b.circle(ball, 0.5)?;
    b.solid(round, 0.5)?;

    let crate_body = b.body(BodyKind::Dynamic, 2.0, 8.0)?;
    let square = b.boxed(crate_body, 0.5, 0.5)?;
    b.solid(square, 0.0)?;
    Ok(())
}

const ARENA: f32 = 10.0;

fn walls<S: Scalar>(b: &mut Builder<'_, S>) -> Result<()> {
    for (x, y, hx, hy) in [
        (0.0, -ARENA, ARENA, 0.5),
        (0.0, ARENA, ARENA, 0.5),
        (-ARENA, 0.0, 0.5, ARENA),
        (ARENA, 0.0, 0.5, ARENA),
    ] {
        let wall = b.body(BodyKind::Static, x, y)?;
        let collider = b.boxed(wall, hx, hy)?;
        b.solid(collider, 1.0)?;
    }
    Ok(())
}

fn collisions<S: Scalar>(b: &mut Builder<'_, S>, params: SceneParams) -> Result<()> {
    walls(b)?;
    let mut rng = Prng::from_seed_u64(params.seed);
    let span = ARENA - 1.5;
    for i in 0..params.count {
        let body = b.body(BodyKind::Dynamic, rng.next_range(-span, span), rng.next_range(-span, span))?;
        b.velocity(body, rng.next_range(-4.0, 4.0), rng.next_range(-4.0, 4.0))?;
        let size = rng.next_range(0.2, 0.6);
        let collider = if i % 3 == 0 { b.boxed(body, size, size)? } else { b.circle(body, size)? };
        b.solid(collider, 0.8)?;
    }
    Ok(())
}

fn triggers<S: Scalar>(b: &mut Builder<'_, S>, params: SceneParams) -> Result<()> {
    let mut rng = Prng::from_seed_u64(params.seed);
    for (x, y) in [(-5.0, 0.0), (5.0, 0.0), (0.0, 5.0), (0.0, -5.0)] {
        let zone = b.body(BodyKind::Static, x, y)?;
        b.boxed(zone, 2.0, 2.0)?;
    }
    for _ in 0..params.count {
        let body = b.body(BodyKind::Kinematic, rng.next_range(-8.0, 8.0), rng.next_range(-8.0, 8.0))?;
        b.velocity(body, rng.next_range(-3.0, 3.0), rng.next_range(-3.0, 3.0))?;
        b.circle(body, rng.next_range(0.2, 0.8))?;
    }
    Ok(())
}
