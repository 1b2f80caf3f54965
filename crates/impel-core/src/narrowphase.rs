// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact pair tests, contact construction and manifold upkeep.

use impel_geom::intersect::{self, Penetration};
use impel_geom::{BroadPhase, ColliderPair};
use impel_math::Scalar;
use rustc_hash::FxHashSet;

use crate::body::{Body, BodyKind};
use crate::collider::{Collider, ShapeKind};
use crate::contact::Contact;
use crate::listener::ContactListener;
use crate::world::{StepReport, World};

/// Verdict for one candidate pair.
enum PairTest<S> {
    /// Not eligible this frame: a side is gone or inactive, both sides are
    /// static, or both colliders share a body.
    Skipped,
    /// Tested and not intersecting.
    Apart,
    /// Intersecting; carries the contact for solid pairs.
    Touching(Option<Contact<S>>),
}

impl<S: Scalar> World<S> {
    /// Runs exact tests over the broad phase's candidates and updates the
    /// manifold.
    ///
    /// A pair that starts intersecting fires an enter event and, when neither
    /// collider is a trigger, has its contact resolved. A solid pair that stays
    /// intersecting is resolved again every frame. Any manifold pair not
    /// confirmed intersecting this frame fires its exit event, whether the
    /// exact test failed or the broad phase no longer reports it. Manifold
    /// changes are collected during the scan and applied afterwards.
    pub fn resolve_narrowphase<B, L>(&mut self, broadphase: &B, listener: &mut L) -> StepReport
    where
        B: BroadPhase<S> + ?Sized,
        L: ContactListener + ?Sized,
    {
        let candidates = broadphase.possible_pairs();
        let mut report = StepReport { candidate_pairs: candidates.len(), ..StepReport::default() };
        let mut touching: FxHashSet<ColliderPair> = FxHashSet::default();
        touching.reserve(self.manifold.len());
        let mut inserts: Vec<(ColliderPair, Option<Contact<S>>)> = Vec::new();

        for &pair in candidates {
            let contact = match self.test_pair(pair) {
                PairTest::Skipped => continue,
                PairTest::Apart => {
                    report.narrowphase_tests += 1;
                    continue;
                }
                PairTest::Touching(contact) => {
                    report.narrowphase_tests += 1;
                    contact
                }
            };
            if !touching.insert(pair) {
                continue;
            }
            if !self.manifold.contains_key(&pair) {
                if contact.is_some() {
                    listener.on_collision_enter(pair);
                    report.collision_enters += 1;
                } else {
                    listener.on_trigger_enter(pair);
                    report.trigger_enters += 1;
                }
            }
            if let Some(contact) = &contact {
                if self.resolve_contact(contact) {
                    report.resolved_contacts += 1;
                }
            }
            inserts.push((pair, contact));
        }

        let mut exits: Vec<(ColliderPair, bool)> = self
            .manifold
            .iter()
            .filter(|(pair, _)| !touching.contains(*pair))
            .map(|(pair, contact)| (*pair, contact.is_some()))
            .collect();
        exits.sort_unstable_by_key(|(pair, _)| *pair);
        for &(pair, solid) in &exits {
            if solid {
                listener.on_collision_exit(pair);
                report.collision_exits += 1;
            } else {
                listener.on_trigger_exit(pair);
                report.trigger_exits += 1;
            }
        }

        for (pair, _) in exits {
            self.manifold.remove(&pair);
        }
        for (pair, contact) in inserts {
            self.manifold.insert(pair, contact);
        }
        report
    }

    fn test_pair(&self, pair: ColliderPair) -> PairTest<S> {
        let (Ok(a), Ok(b)) = (self.collider(pair.first), self.collider(pair.second)) else {
            return PairTest::Skipped;
        };
        if a.body == b.body {
            return PairTest::Skipped;
        }
        let (Ok(body_a), Ok(body_b)) = (self.body(a.body), self.body(b.body)) else {
            return PairTest::Skipped;
        };
        if !body_a.is_live() || !body_b.is_live() {
            return PairTest::Skipped;
        }
        if body_a.kind == BodyKind::Static && body_b.kind == BodyKind::Static {
            return PairTest::Skipped;
        }

        let Some(hit) = self.penetration(a, body_a, b, body_b) else {
            return PairTest::Apart;
        };
        if a.is_trigger || b.is_trigger {
            return PairTest::Touching(None);
        }
        PairTest::Touching(Some(Contact {
            bodies: [a.body, b.body],
            colliders: [a.handle, b.handle],
            normal: hit.normal,
            point: hit.point,
            restitution: a.restitution.maximum(b.restitution),
            penetration: hit.depth,
        }))
    }

    /// Dispatches on the shape kinds. The normal always points from `b`
    /// toward `a`.
    fn penetration(
        &self,
        a: &Collider<S>,
        body_a: &Body<S>,
        b: &Collider<S>,
        body_b: &Body<S>,
    ) -> Option<Penetration<S>> {
        let center_a = body_a.position + a.offset;
        let center_b = body_b.position + b.offset;
        let shape_a = a.shape.index()?;
        let shape_b = b.shape.index()?;
        match (a.kind, b.kind) {
            (ShapeKind::Box, ShapeKind::Box) => {
                let box_a = self.boxes.get(shape_a).filter(|s| !s.is_unset())?;
                let box_b = self.boxes.get(shape_b).filter(|s| !s.is_unset())?;
                intersect::box_box(&box_a.aabb(center_a), &box_b.aabb(center_b))
            }
            (ShapeKind::Box, ShapeKind::Circle) => {
                let box_a = self.boxes.get(shape_a).filter(|s| !s.is_unset())?;
                let circle_b = self.circles.get(shape_b).filter(|s| !s.is_unset())?;
                intersect::box_circle(&box_a.aabb(center_a), &circle_b.at(center_b))
            }
            (ShapeKind::Circle, ShapeKind::Box) => {
                let mut hit = self.penetration(b, body_b, a, body_a)?;
                hit.normal = -hit.normal;
                Some(hit)
            }
            (ShapeKind::Circle, ShapeKind::Circle) => {
                let circle_a = self.circles.get(shape_a).filter(|s| !s.is_unset())?;
                let circle_b = self.circles.get(shape_b).filter(|s| !s.is_unset())?;
                intersect::circle_circle(&circle_a.at(center_a), &circle_b.at(center_b))
            }
            _ => None,
        }
    }

    fn resolve_contact(&mut self, contact: &Contact<S>) -> bool {
        let (Some(i), Some(j)) = (contact.bodies[0].index(), contact.bodies[1].index()) else {
            return false;
        };
        let Some((first, second)) = two_mut(self.bodies.slots_mut(), i, j) else {
            return false;
        };
        let outcome = contact.resolve(first, second);
        outcome.impulse || outcome.correction
    }
}

fn two_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j || i.max(j) >= items.len() {
        return None;
    }
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        Some((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = items.split_at_mut(i);
        Some((&mut hi[0], &mut lo[j]))
    }
}
