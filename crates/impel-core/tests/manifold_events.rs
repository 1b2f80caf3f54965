// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used)]
//! Enter/exit edge detection across steps.

use impel_core::{
    AllPairs, BodyHandle, BodyKind, ColliderHandle, ColliderPair, ContactEvent, EventLog, F32Scalar, QuadTree,
    Vec2, World, WorldConfig,
};

fn world() -> World<F32Scalar> {
    World::new(&WorldConfig { gravity: [0.0, 0.0], ..WorldConfig::default() }).expect("valid config")
}

fn circle(world: &mut World<F32Scalar>, x: f32, radius: f32, trigger: bool) -> (BodyHandle, ColliderHandle) {
    let body = world.add_body();
    world.body_mut(body).expect("live").position = Vec2::from_f32(x, 0.0);
    let collider = world.add_circle_collider(body).expect("live body");
    world.set_circle_radius(collider, F32Scalar::new(radius)).expect("circle");
    world.collider_mut(collider).expect("live").is_trigger = trigger;
    (body, collider)
}

#[test]
fn trigger_pass_through_fires_one_enter_and_one_exit() {
    let mut w = world();
    let (sensor_body, sensor) = circle(&mut w, 0.0, 0.5, true);
    w.body_mut(sensor_body).expect("live").kind = BodyKind::Static;
    let (mover_body, mover) = circle(&mut w, -2.0, 0.5, false);
    {
        let body = w.body_mut(mover_body).expect("live");
        body.kind = BodyKind::Kinematic;
        body.velocity = Vec2::from_f32(5.0, 0.0);
    }
    let pair = ColliderPair::new(sensor, mover);
    let mut bp = QuadTree::default();
    let mut log = EventLog::new();
    let mut timeline = Vec::new();
    for _ in 0..8 {
        let report = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
        timeline.push((report.trigger_enters, report.trigger_exits, w.is_in_contact(pair)));
    }
    // x after each step: -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0
    assert_eq!(
        timeline,
        vec![
            (0, 0, false),
            (0, 0, false),
            (1, 0, true),
            (0, 0, true),
            (0, 0, true),
            (0, 1, false),
            (0, 0, false),
            (0, 0, false),
        ]
    );
    assert_eq!(log.events(), &[ContactEvent::TriggerEnter(pair), ContactEvent::TriggerExit(pair)]);
    assert_eq!(w.body(mover_body).expect("live").velocity, Vec2::from_f32(5.0, 0.0));
}

#[test]
fn resting_solid_contact_enters_once_and_exits_once() {
    let mut w = world();
    let (a_body, a) = circle(&mut w, 0.0, 1.0, false);
    let (b_body, b) = circle(&mut w, 1.5, 1.0, false);
    let mut bp = AllPairs::new();
    let mut log = EventLog::new();

    let first = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert_eq!(first.collision_enters, 1);
    assert_eq!(first.resolved_contacts, 1);
    let contact = *w.contact(ColliderPair::new(a, b)).expect("solid contact stored");
    assert_eq!(contact.normal, Vec2::from_f32(-1.0, 0.0));
    assert_eq!(contact.penetration, F32Scalar::new(0.5));

    // Positional correction split evenly: 0.25 each, leaving them tangent.
    assert_eq!(w.body(a_body).expect("live").position, Vec2::from_f32(-0.25, 0.0));
    assert_eq!(w.body(b_body).expect("live").position, Vec2::from_f32(1.75, 0.0));

    // Tangent circles do not intersect, so the next step exits.
    let second = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert_eq!(second.collision_exits, 1);
    let third = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    // The bounds still touch, so the pair stays a candidate.
    assert_eq!(
        third,
        impel_core::StepReport {
            integrated: 2,
            inserted: 2,
            candidate_pairs: 1,
            narrowphase_tests: 1,
            ..Default::default()
        }
    );
    let pair = ColliderPair::new(a, b);
    assert_eq!(log.events(), &[ContactEvent::CollisionEnter(pair), ContactEvent::CollisionExit(pair)]);
}

#[test]
fn overlapping_triggers_stay_entered() {
    let mut w = world();
    let (_, a) = circle(&mut w, 0.0, 1.0, true);
    let (_, b) = circle(&mut w, 0.5, 1.0, true);
    let mut bp = QuadTree::default();
    let mut log = EventLog::new();
    for _ in 0..20 {
        w.step(F32Scalar::new(1.0 / 60.0), &mut bp, &mut log).expect("valid dt");
    }
    assert_eq!(log.events(), &[ContactEvent::TriggerEnter(ColliderPair::new(a, b))]);
    assert_eq!(w.manifold_len(), 1);
    assert!(w.contact(ColliderPair::new(a, b)).is_none(), "triggers carry no contact");
}

#[test]
fn skipped_pairs_never_enter() {
    let mut w = world();
    let (a_body, _) = circle(&mut w, 0.0, 1.0, true);
    let (b_body, _) = circle(&mut w, 0.5, 1.0, true);
    w.body_mut(a_body).expect("live").kind = BodyKind::Static;
    w.body_mut(b_body).expect("live").kind = BodyKind::Static;
    // Two colliders on one body never pair either.
    let (c_body, _) = circle(&mut w, 10.0, 1.0, true);
    let extra = w.add_box_collider(c_body).expect("live body");
    w.set_box_half_extents(extra, Vec2::from_f32(1.0, 1.0)).expect("box");

    let mut bp = AllPairs::new();
    let mut log = EventLog::new();
    let report = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert_eq!(report.candidate_pairs, 2);
    assert_eq!(report.narrowphase_tests, 0);
    assert!(log.is_empty());
}

#[test]
fn deactivating_a_body_exits_its_pairs() {
    let mut w = world();
    let (_, a) = circle(&mut w, 0.0, 1.0, true);
    let (b_body, b) = circle(&mut w, 0.5, 1.0, true);
    let mut bp = AllPairs::new();
    let mut log = EventLog::new();
    w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    w.body_mut(b_body).expect("live").active = false;
    let report = w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert_eq!(report.trigger_exits, 1);
    assert_eq!(log.drain().last(), Some(&ContactEvent::TriggerExit(ColliderPair::new(a, b))));
    assert_eq!(w.manifold_len(), 0);
}

#[test]
fn removing_a_collider_purges_the_manifold_silently() {
    let mut w = world();
    let (_, a) = circle(&mut w, 0.0, 1.0, false);
    let (b_body, _) = circle(&mut w, 0.5, 1.0, false);
    let mut bp = AllPairs::new();
    let mut log = EventLog::new();
    w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert_eq!(w.manifold_len(), 1);
    w.remove_body(b_body).expect("live");
    assert_eq!(w.manifold_len(), 0);
    log.drain();
    w.step(F32Scalar::new(0.1), &mut bp, &mut log).expect("valid dt");
    assert!(log.is_empty());
    w.remove_body(b_body).expect("second removal is a no-op");
    assert!(w.collider(a).is_ok());
}
