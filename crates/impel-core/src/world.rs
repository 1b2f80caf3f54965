// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_geom::{Aabb, BodyHandle, BroadPhase, ColliderAabb, ColliderHandle, ColliderPair, Plane, ShapeHandle};
use impel_math::{F32Scalar, Scalar, Vec2};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use crate::arena::SlotArena;
use crate::body::Body;
use crate::collider::{BoxShape, CircleShape, Collider, ShapeKind};
use crate::config::{ConfigError, WorldConfig};
use crate::contact::Contact;
use crate::error::PhysicsError;
use crate::listener::ContactListener;

/// Work done by one [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Bodies whose position was integrated.
    pub integrated: usize,
    /// Colliders handed to the broad phase.
    pub inserted: usize,
    /// Candidate pairs returned by the broad phase.
    pub candidate_pairs: usize,
    /// Candidates that reached an exact intersection test.
    pub narrowphase_tests: usize,
    /// Trigger pairs that started overlapping.
    pub trigger_enters: usize,
    /// Trigger pairs that stopped overlapping.
    pub trigger_exits: usize,
    /// Solid pairs that started touching.
    pub collision_enters: usize,
    /// Solid pairs that stopped touching.
    pub collision_exits: usize,
    /// Solid contacts that changed a velocity or a position.
    pub resolved_contacts: usize,
}

/// Owner of all bodies, colliders and shapes, and of the contact manifold.
///
/// Storage is slot-based: removing an entity leaves a tombstone and the next
/// creation of the same kind reuses the lowest free slot, so handles stay
/// small dense integers. Every accessor checks its handle and reports stale or
/// out-of-range handles as [`PhysicsError`] instead of aliasing a reused slot.
///
/// The broad phase and the contact listener are owned by the caller and lent
/// to [`World::step`], so either can be swapped without touching the world.
#[derive(Debug, Clone)]
pub struct World<S: Scalar = F32Scalar> {
    gravity: Vec2<S>,
    pub(crate) bodies: SlotArena<Body<S>>,
    pub(crate) colliders: SlotArena<Collider<S>>,
    pub(crate) boxes: SlotArena<BoxShape<S>>,
    pub(crate) circles: SlotArena<CircleShape<S>>,
    pub(crate) planes: SlotArena<Plane<S>>,
    pub(crate) manifold: FxHashMap<ColliderPair, Option<Contact<S>>>,
}

impl<S: Scalar> Default for World<S> {
    fn default() -> Self {
        Self::build(&WorldConfig::default())
    }
}

impl<S: Scalar> World<S> {
    /// Creates an empty world.
    ///
    /// # Errors
    /// [`ConfigError`] when `config` does not validate.
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &WorldConfig) -> Self {
        let mut manifold = FxHashMap::default();
        manifold.reserve(config.manifold_capacity);
        Self {
            gravity: config.gravity(),
            bodies: SlotArena::with_capacity(64),
            colliders: SlotArena::with_capacity(64),
            boxes: SlotArena::with_capacity(32),
            circles: SlotArena::with_capacity(32),
            planes: SlotArena::with_capacity(4),
            manifold,
        }
    }

    /// Gravity acceleration applied to dynamic bodies.
    pub const fn gravity(&self) -> Vec2<S> {
        self.gravity
    }

    /// Replaces the gravity acceleration.
    pub fn set_gravity(&mut self, gravity: Vec2<S>) {
        self.gravity = gravity;
    }

    /// Drops every body, collider, shape and manifold entry.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.colliders.clear();
        self.boxes.clear();
        self.circles.clear();
        self.planes.clear();
        self.manifold.clear();
        debug!("world cleared");
    }

    /// Overwrites this world with a copy of `other`, reusing allocations.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    // ── Bodies ──────────────────────────────────────────────────────────

    /// Creates a default dynamic body and returns its handle.
    pub fn add_body(&mut self) -> BodyHandle {
        let handle = BodyHandle::from_index(self.bodies.allocate(Body::default()));
        debug!(%handle, "body added");
        handle
    }

    /// Removes a body together with every collider attached to it.
    ///
    /// Removing an already removed body is a no-op.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] when the handle never named a slot.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        let index = self.body_slot(handle)?;
        if !self.bodies.release(index, Body::removed()) {
            return Ok(());
        }
        let attached: Vec<ColliderHandle> =
            self.colliders.iter_live().filter(|(_, c)| c.body == handle).map(|(_, c)| c.handle).collect();
        for collider in &attached {
            self.remove_collider(*collider)?;
        }
        debug!(%handle, colliders = attached.len(), "body removed");
        Ok(())
    }

    /// Live body behind `handle`.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] for stale or out-of-range handles.
    pub fn body(&self, handle: BodyHandle) -> Result<&Body<S>, PhysicsError> {
        handle.index().and_then(|i| self.bodies.get(i)).ok_or(PhysicsError::InvalidBody(handle))
    }

    /// Mutable access to the live body behind `handle`.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] for stale or out-of-range handles.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body<S>, PhysicsError> {
        handle.index().and_then(|i| self.bodies.get_mut(i)).ok_or(PhysicsError::InvalidBody(handle))
    }

    /// Live bodies in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body<S>)> + '_ {
        self.bodies.iter_live().map(|(i, b)| (BodyHandle::from_index(i), b))
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.live_count()
    }

    fn body_slot(&self, handle: BodyHandle) -> Result<usize, PhysicsError> {
        handle
            .index()
            .filter(|&i| i < self.bodies.slots().len())
            .ok_or(PhysicsError::InvalidBody(handle))
    }

    // ── Colliders ───────────────────────────────────────────────────────

    /// Attaches a box collider to `body`. The box starts unset (negative
    /// half-extents) and is ignored until given a size.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] when `body` is not live.
    pub fn add_box_collider(&mut self, body: BodyHandle) -> Result<ColliderHandle, PhysicsError> {
        self.body(body)?;
        let shape = self.boxes.allocate(BoxShape::unset());
        Ok(self.attach(body, ShapeHandle::from_index(shape), ShapeKind::Box))
    }

    /// Attaches a circle collider to `body`. The circle starts unset (negative
    /// radius) and is ignored until given a size.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] when `body` is not live.
    pub fn add_circle_collider(&mut self, body: BodyHandle) -> Result<ColliderHandle, PhysicsError> {
        self.body(body)?;
        let shape = self.circles.allocate(CircleShape::unset());
        Ok(self.attach(body, ShapeHandle::from_index(shape), ShapeKind::Circle))
    }

    /// Attaches a plane collider to `body`. The plane starts with a zero
    /// normal. Planes widen the broad-phase world bound but are never tested.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBody`] when `body` is not live.
    pub fn add_plane_collider(&mut self, body: BodyHandle) -> Result<ColliderHandle, PhysicsError> {
        self.body(body)?;
        let shape = self.planes.allocate(Plane::default());
        Ok(self.attach(body, ShapeHandle::from_index(shape), ShapeKind::Plane))
    }

    fn attach(&mut self, body: BodyHandle, shape: ShapeHandle, kind: ShapeKind) -> ColliderHandle {
        let index = self.colliders.allocate(Collider::new(body, ColliderHandle::INVALID, shape, kind));
        let handle = ColliderHandle::from_index(index);
        if let Some(collider) = self.colliders.get_mut(index) {
            collider.handle = handle;
        }
        debug!(%handle, %body, %shape, %kind, "collider added");
        handle
    }

    /// Removes a box collider. Removing an already removed collider is a no-op.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for out-of-range handles,
    /// [`PhysicsError::ShapeMismatch`] when the collider is not a box.
    pub fn remove_box_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        self.remove_collider_of(handle, ShapeKind::Box)
    }

    /// Removes a circle collider. Removing an already removed collider is a
    /// no-op.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for out-of-range handles,
    /// [`PhysicsError::ShapeMismatch`] when the collider is not a circle.
    pub fn remove_circle_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        self.remove_collider_of(handle, ShapeKind::Circle)
    }

    /// Removes a plane collider. Removing an already removed collider is a
    /// no-op.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for out-of-range handles,
    /// [`PhysicsError::ShapeMismatch`] when the collider is not a plane.
    pub fn remove_plane_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        self.remove_collider_of(handle, ShapeKind::Plane)
    }

    fn remove_collider_of(&mut self, handle: ColliderHandle, expected: ShapeKind) -> Result<(), PhysicsError> {
        let index = self.collider_slot(handle)?;
        let Some(found) = self.colliders.get(index).map(|c| c.kind) else {
            return Ok(());
        };
        if found != expected {
            return Err(PhysicsError::ShapeMismatch { collider: handle, expected, found });
        }
        self.remove_collider(handle)
    }

    /// Removes a collider of any kind, releases its shape payload, and drops
    /// its manifold entries without exit events.
    ///
    /// Removing an already removed collider is a no-op.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for out-of-range handles.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        let index = self.collider_slot(handle)?;
        let Some(collider) = self.colliders.get(index).copied() else {
            return Ok(());
        };
        if let Some(shape) = collider.shape.index() {
            match collider.kind {
                ShapeKind::Box => {
                    self.boxes.release(shape, BoxShape::unset());
                }
                ShapeKind::Circle => {
                    self.circles.release(shape, CircleShape::unset());
                }
                ShapeKind::Plane => {
                    self.planes.release(shape, Plane::default());
                }
                ShapeKind::None => {}
            }
        }
        self.colliders.release(index, Collider::removed());
        self.manifold.retain(|pair, _| !pair.contains(handle));
        debug!(%handle, kind = %collider.kind, "collider removed");
        Ok(())
    }

    /// Live collider behind `handle`.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for stale or out-of-range handles.
    pub fn collider(&self, handle: ColliderHandle) -> Result<&Collider<S>, PhysicsError> {
        handle.index().and_then(|i| self.colliders.get(i)).ok_or(PhysicsError::InvalidCollider(handle))
    }

    /// Mutable access to the live collider behind `handle`.
    ///
    /// Changing `body`, `handle`, `shape` or `kind` through this reference
    /// detaches the collider from its bookkeeping; adjust the other fields.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] for stale or out-of-range handles.
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Result<&mut Collider<S>, PhysicsError> {
        handle.index().and_then(|i| self.colliders.get_mut(i)).ok_or(PhysicsError::InvalidCollider(handle))
    }

    /// Live colliders in slot order.
    pub fn colliders(&self) -> impl Iterator<Item = &Collider<S>> + '_ {
        self.colliders.iter_live().map(|(_, c)| c)
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.live_count()
    }

    fn collider_slot(&self, handle: ColliderHandle) -> Result<usize, PhysicsError> {
        handle
            .index()
            .filter(|&i| i < self.colliders.slots().len())
            .ok_or(PhysicsError::InvalidCollider(handle))
    }

    // ── Shapes ──────────────────────────────────────────────────────────

    /// Box payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn box_shape(&self, shape: ShapeHandle) -> Result<&BoxShape<S>, PhysicsError> {
        shape.index().and_then(|i| self.boxes.get(i)).ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Box, shape })
    }

    /// Mutable box payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn box_shape_mut(&mut self, shape: ShapeHandle) -> Result<&mut BoxShape<S>, PhysicsError> {
        shape
            .index()
            .and_then(|i| self.boxes.get_mut(i))
            .ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Box, shape })
    }

    /// Circle payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn circle_shape(&self, shape: ShapeHandle) -> Result<&CircleShape<S>, PhysicsError> {
        shape
            .index()
            .and_then(|i| self.circles.get(i))
            .ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Circle, shape })
    }

    /// Mutable circle payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn circle_shape_mut(&mut self, shape: ShapeHandle) -> Result<&mut CircleShape<S>, PhysicsError> {
        shape
            .index()
            .and_then(|i| self.circles.get_mut(i))
            .ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Circle, shape })
    }

    /// Plane payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn plane_shape(&self, shape: ShapeHandle) -> Result<&Plane<S>, PhysicsError> {
        shape
            .index()
            .and_then(|i| self.planes.get(i))
            .ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Plane, shape })
    }

    /// Mutable plane payload behind a shape handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidShape`] for stale or out-of-range handles.
    pub fn plane_shape_mut(&mut self, shape: ShapeHandle) -> Result<&mut Plane<S>, PhysicsError> {
        shape
            .index()
            .and_then(|i| self.planes.get_mut(i))
            .ok_or(PhysicsError::InvalidShape { kind: ShapeKind::Plane, shape })
    }

    /// Sizes the box behind a box collider.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] or [`PhysicsError::ShapeMismatch`].
    pub fn set_box_half_extents(&mut self, collider: ColliderHandle, half_extents: Vec2<S>) -> Result<(), PhysicsError> {
        let shape = self.shape_of(collider, ShapeKind::Box)?;
        self.box_shape_mut(shape)?.half_extents = half_extents;
        Ok(())
    }

    /// Sizes the circle behind a circle collider.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] or [`PhysicsError::ShapeMismatch`].
    pub fn set_circle_radius(&mut self, collider: ColliderHandle, radius: S) -> Result<(), PhysicsError> {
        let shape = self.shape_of(collider, ShapeKind::Circle)?;
        self.circle_shape_mut(shape)?.radius = radius;
        Ok(())
    }

    /// Orients the plane behind a plane collider.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidCollider`] or [`PhysicsError::ShapeMismatch`].
    pub fn set_plane_normal(&mut self, collider: ColliderHandle, normal: Vec2<S>) -> Result<(), PhysicsError> {
        let shape = self.shape_of(collider, ShapeKind::Plane)?;
        self.plane_shape_mut(shape)?.normal = normal;
        Ok(())
    }

    fn shape_of(&self, collider: ColliderHandle, expected: ShapeKind) -> Result<ShapeHandle, PhysicsError> {
        let c = self.collider(collider)?;
        if c.kind == expected {
            Ok(c.shape)
        } else {
            Err(PhysicsError::ShapeMismatch { collider, expected, found: c.kind })
        }
    }

    /// World-space centre of a collider: body position plus offset.
    pub(crate) fn collider_center(&self, collider: &Collider<S>) -> Option<Vec2<S>> {
        let body = collider.body.index().and_then(|i| self.bodies.get(i))?;
        body.is_live().then_some(body.position + collider.offset)
    }

    /// Current bounds of a box or circle collider with a set size.
    pub(crate) fn collider_aabb(&self, collider: &Collider<S>, center: Vec2<S>) -> Option<Aabb<S>> {
        let shape = collider.shape.index()?;
        match collider.kind {
            ShapeKind::Box => self.boxes.get(shape).filter(|b| !b.is_unset()).map(|b| b.aabb(center)),
            ShapeKind::Circle => self.circles.get(shape).filter(|c| !c.is_unset()).map(|c| c.at(center).aabb()),
            ShapeKind::Plane | ShapeKind::None => None,
        }
    }

    // ── Manifold ────────────────────────────────────────────────────────

    /// Pairs currently in contact.
    pub fn manifold_len(&self) -> usize {
        self.manifold.len()
    }

    /// `true` while `pair` is overlapping (trigger) or touching (solid).
    pub fn is_in_contact(&self, pair: ColliderPair) -> bool {
        self.manifold.contains_key(&pair)
    }

    /// Latest contact for a solid pair in contact.
    pub fn contact(&self, pair: ColliderPair) -> Option<&Contact<S>> {
        self.manifold.get(&pair).and_then(Option::as_ref)
    }

    /// Manifold pairs in canonical order.
    pub fn manifold_pairs(&self) -> Vec<ColliderPair> {
        let mut pairs: Vec<ColliderPair> = self.manifold.keys().copied().collect();
        pairs.sort_unstable();
        pairs
    }

    // ── Stepping ────────────────────────────────────────────────────────

    /// Advances the world by `dt` seconds.
    ///
    /// Integrates every active body, rebuilds `broadphase` from the current
    /// collider bounds, then runs the narrow phase over its candidates,
    /// reporting transitions to `listener` and resolving solid contacts.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidStep`] when `dt` is negative or not finite. The
    /// world is left untouched in that case.
    #[instrument(level = "trace", skip_all, fields(dt = dt.to_f32()))]
    pub fn step<B, L>(&mut self, dt: S, broadphase: &mut B, listener: &mut L) -> Result<StepReport, PhysicsError>
    where
        B: BroadPhase<S> + ?Sized,
        L: ContactListener + ?Sized,
    {
        let raw = dt.to_f32();
        if !raw.is_finite() || dt < S::zero() {
            return Err(PhysicsError::InvalidStep(raw));
        }

        let integrated = self.integrate(dt);
        let inserted = self.resolve_broadphase(broadphase);
        let mut report = self.resolve_narrowphase(&*broadphase, listener);
        report.integrated = integrated;
        report.inserted = inserted;
        trace!(
            integrated,
            inserted,
            candidates = report.candidate_pairs,
            tests = report.narrowphase_tests,
            enters = report.trigger_enters + report.collision_enters,
            exits = report.trigger_exits + report.collision_exits,
            resolved = report.resolved_contacts,
            "step"
        );
        Ok(report)
    }

    fn integrate(&mut self, dt: S) -> usize {
        let gravity = self.gravity;
        let mut moved = 0;
        for body in self.bodies.slots_mut() {
            if body.integrate(gravity, dt) {
                moved += 1;
            }
        }
        moved
    }

    /// Rebuilds `broadphase` for the current frame and returns how many
    /// colliders were inserted.
    ///
    /// The world bound is the box around every active collider centre,
    /// planes included. Boxes and circles with a set size are inserted with
    /// their tight bounds; planes are not inserted.
    pub fn resolve_broadphase<B>(&self, broadphase: &mut B) -> usize
    where
        B: BroadPhase<S> + ?Sized,
    {
        broadphase.clear();
        let centers = self.colliders.iter_live().filter_map(|(_, c)| self.collider_center(c));
        broadphase.set_world_bound(Aabb::enclosing(centers).unwrap_or_default());

        let mut inserted = 0;
        for (_, collider) in self.colliders.iter_live() {
            let Some(center) = self.collider_center(collider) else {
                continue;
            };
            if let Some(aabb) = self.collider_aabb(collider, center) {
                broadphase.insert(ColliderAabb::new(collider.handle, aabb));
                inserted += 1;
            }
        }
        broadphase.calculate_pairs();
        inserted
    }
}
