// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used)]
//! Whole-world scenarios: resting contact, conservation, static invariance,
//! and lane determinism.

use impel_core::{
    AllPairs, BodyHandle, BodyKind, ContactEvent, DFix64, EventLog, F32Scalar, QuadTree, Scalar, Vec2, World,
    WorldConfig,
};
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

fn world_with_gravity<S: Scalar>(gravity: [f32; 2]) -> World<S> {
    World::new(&WorldConfig { gravity, ..WorldConfig::default() }).expect("valid config")
}

/// Static box with half-extents (5, 1) centred at (0, 3); a dynamic circle of
/// radius 0.5 at the origin. Gravity points +Y, toward the box.
fn ceiling_scene<S: Scalar>() -> (World<S>, BodyHandle, BodyHandle) {
    let mut w = world_with_gravity([0.0, 9.81]);
    let ground = w.add_body();
    {
        let body = w.body_mut(ground).expect("live");
        body.position = Vec2::from_f32(0.0, 3.0);
        body.kind = BodyKind::Static;
    }
    let slab = w.add_box_collider(ground).expect("live body");
    w.set_box_half_extents(slab, Vec2::from_f32(5.0, 1.0)).expect("box");
    let c = w.collider_mut(slab).expect("live");
    c.is_trigger = false;
    c.restitution = S::zero();

    let ball = w.add_body();
    let round = w.add_circle_collider(ball).expect("live body");
    w.set_circle_radius(round, S::from_f32(0.5)).expect("circle");
    let c = w.collider_mut(round).expect("live");
    c.is_trigger = false;
    c.restitution = S::zero();
    (w, ground, ball)
}

#[test]
fn falling_circle_comes_to_rest_against_static_box() {
    let (mut w, ground, ball) = ceiling_scene::<F32Scalar>();
    let mut bp = QuadTree::default();
    let mut log = EventLog::new();
    let dt = F32Scalar::new(1.0 / 60.0);
    for _ in 0..300 {
        w.step(dt, &mut bp, &mut log).expect("valid dt");
    }
    let body = w.body(ball).expect("live");
    let [_, vy] = body.velocity.to_f32_array();
    let [_, y] = body.position.to_f32_array();
    assert!(vy.abs() < 1e-3, "vy={vy}");
    // Box bottom face sits at y = 2; the circle top must not pass it by more
    // than one frame of gravity drift.
    assert!(y + 0.5 <= 2.0 + 1e-2, "y={y}");
    assert!(y > 1.4, "y={y}");
    assert_eq!(log.events().iter().filter(|e| e.is_enter()).count(), 1);
    assert!(matches!(log.events()[0], ContactEvent::CollisionEnter(_)));

    let ground_body = w.body(ground).expect("live");
    assert_eq!(ground_body.position, Vec2::from_f32(0.0, 3.0));
    assert_eq!(ground_body.velocity, Vec2::zero());
}

#[test]
fn elastic_head_on_preserves_kinetic_energy() {
    let mut w = world_with_gravity::<F32Scalar>([0.0, 0.0]);
    let mut bodies = Vec::new();
    for (x, vx) in [(-0.45, 1.0), (0.45, -1.0)] {
        let b = w.add_body();
        {
            let body = w.body_mut(b).expect("live");
            body.position = Vec2::from_f32(x, 0.0);
            body.velocity = Vec2::from_f32(vx, 0.0);
        }
        let c = w.add_circle_collider(b).expect("live body");
        w.set_circle_radius(c, F32Scalar::new(0.5)).expect("circle");
        w.collider_mut(c).expect("live").is_trigger = false;
        bodies.push(b);
    }
    let energy = |w: &World<F32Scalar>| -> f32 {
        bodies.iter().map(|b| w.body(*b).expect("live").velocity.length_squared().get()).sum()
    };
    let before = energy(&w);
    let mut bp = AllPairs::new();
    let report = w.step(F32Scalar::new(0.01), &mut bp, &mut ()).expect("valid dt");
    assert_eq!(report.collision_enters, 1);
    let va = w.body(bodies[0]).expect("live").velocity.to_f32_array();
    let vb = w.body(bodies[1]).expect("live").velocity.to_f32_array();
    assert!((va[0] + 1.0).abs() < 1e-5, "va={va:?}");
    assert!((vb[0] - 1.0).abs() < 1e-5, "vb={vb:?}");
    assert!((energy(&w) - before).abs() < 1e-5);
}

#[test]
fn static_bodies_never_move() {
    let seed = [42u8; 32];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &seed);
    let mut runner = TestRunner::new_with_rng(PropConfig { cases: 48, ..PropConfig::default() }, rng);
    let motion = (-3.0f32..3.0, -3.0f32..3.0, -20.0f32..20.0, -20.0f32..20.0, 0.0f32..1.0);

    runner
        .run(&motion, |(x, y, vx, vy, restitution)| {
            let mut w = world_with_gravity::<F32Scalar>([0.0, -9.81]);
            let wall = w.add_body();
            w.body_mut(wall).expect("live").kind = BodyKind::Static;
            let slab = w.add_box_collider(wall).expect("live body");
            w.set_box_half_extents(slab, Vec2::from_f32(2.0, 2.0)).expect("box");
            w.collider_mut(slab).expect("live").is_trigger = false;

            let ball = w.add_body();
            {
                let body = w.body_mut(ball).expect("live");
                body.position = Vec2::from_f32(x, y);
                body.velocity = Vec2::from_f32(vx, vy);
            }
            let round = w.add_circle_collider(ball).expect("live body");
            w.set_circle_radius(round, F32Scalar::new(0.75)).expect("circle");
            let c = w.collider_mut(round).expect("live");
            c.is_trigger = false;
            c.restitution = F32Scalar::new(restitution);

            let mut bp = QuadTree::default();
            for _ in 0..30 {
                w.step(F32Scalar::new(1.0 / 60.0), &mut bp, &mut ()).expect("valid dt");
                let body = w.body(wall).expect("live");
                prop_assert_eq!(body.position, Vec2::zero());
                prop_assert_eq!(body.velocity, Vec2::zero());
            }
            let [bx, by] = w.body(ball).expect("live").position.to_f32_array();
            prop_assert!(bx.is_finite() && by.is_finite());
            Ok(())
        })
        .expect("static bodies must stay put");
}

fn run_fixed(steps: usize) -> World<DFix64> {
    let (mut w, _, _) = ceiling_scene::<DFix64>();
    let mut bp = QuadTree::default();
    for _ in 0..steps {
        w.step(DFix64::from_f32(1.0 / 60.0), &mut bp, &mut ()).expect("valid dt");
    }
    w
}

#[test]
fn fixed_lane_replays_bit_identically() {
    let a = run_fixed(120);
    let b = run_fixed(120);
    assert_eq!(a.state_hash(), b.state_hash());
    let (_, _, ball) = ceiling_scene::<DFix64>();
    let [_, y] = a.body(ball).expect("live").position.to_f32_array();
    assert!(y > 1.4 && y < 1.51, "y={y}");
}

#[test]
fn snapshot_copy_replays_the_same_future() {
    let (mut live, _, _) = ceiling_scene::<F32Scalar>();
    let mut bp = QuadTree::default();
    let dt = F32Scalar::new(1.0 / 60.0);
    for _ in 0..20 {
        live.step(dt, &mut bp, &mut ()).expect("valid dt");
    }
    let mut snapshot = World::default();
    snapshot.copy_from(&live);
    assert_eq!(snapshot.state_hash(), live.state_hash());

    let before = live.state_hash();
    for _ in 0..40 {
        live.step(dt, &mut bp, &mut ()).expect("valid dt");
        snapshot.step(dt, &mut bp, &mut ()).expect("valid dt");
    }
    assert_ne!(live.state_hash(), before);
    assert_eq!(snapshot.state_hash(), live.state_hash());
    assert_eq!(snapshot.manifold_pairs(), live.manifold_pairs());

    snapshot.clear();
    assert_eq!(snapshot.body_count(), 0);
    assert_eq!(snapshot.manifold_len(), 0);
    assert_ne!(snapshot.state_hash(), live.state_hash());
}

#[test]
fn circle_centre_inside_static_box_is_pushed_back_out_the_top() {
    let mut w = world_with_gravity::<F32Scalar>([0.0, 0.0]);
    let slab_body = w.add_body();
    w.body_mut(slab_body).expect("live").kind = BodyKind::Static;
    let slab = w.add_box_collider(slab_body).expect("live body");
    w.set_box_half_extents(slab, Vec2::from_f32(1.0, 1.0)).expect("box");

    let ball = w.add_body();
    {
        let body = w.body_mut(ball).expect("live");
        body.position = Vec2::from_f32(0.0, 0.8);
        body.velocity = Vec2::from_f32(0.0, -3.0);
    }
    let round = w.add_circle_collider(ball).expect("live body");
    w.set_circle_radius(round, F32Scalar::new(0.5)).expect("circle");
    for collider in [slab, round] {
        let c = w.collider_mut(collider).expect("live");
        c.is_trigger = false;
        c.restitution = F32Scalar::new(0.0);
    }

    let mut bp = AllPairs::new();
    let dt = F32Scalar::new(0.01);
    w.step(dt, &mut bp, &mut ()).expect("valid dt");
    let [_, vy] = w.body(ball).expect("live").velocity.to_f32_array();
    assert!(vy.abs() < 1e-6, "approach velocity cancelled on first contact, vy={vy}");

    for _ in 0..10 {
        w.step(dt, &mut bp, &mut ()).expect("valid dt");
    }
    let body = w.body(ball).expect("live");
    let [_, y] = body.position.to_f32_array();
    let [_, vy] = body.velocity.to_f32_array();
    // Box top face is y = 1; the circle rests on it from above.
    assert!(y > 1.0, "y={y}");
    assert!((y - 1.5).abs() < 1e-3, "y={y}");
    assert!(vy.abs() < 1e-6, "vy={vy}");
    assert_eq!(w.body(slab_body).expect("live").position, Vec2::zero());
}
