// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use impel_math::{Scalar, Vec2};

use crate::world::World;

const DOMAIN: &[u8] = b"impel:world:v1\0";

fn put_scalar<S: Scalar>(h: &mut blake3::Hasher, v: S) {
    h.update(&v.to_bits().to_le_bytes());
}

fn put_vec<S: Scalar>(h: &mut blake3::Hasher, v: Vec2<S>) {
    put_scalar(h, v.x);
    put_scalar(h, v.y);
}

fn put_len(h: &mut blake3::Hasher, len: usize) {
    h.update(&(len as u64).to_le_bytes());
}

impl<S: Scalar> World<S> {
    /// BLAKE3 digest of the complete simulation state.
    ///
    /// Covers gravity, every body, collider and shape slot (tombstones
    /// included, so slot reuse is part of the state), and the manifold in
    /// canonical pair order. Scalars are hashed through their canonical bit
    /// patterns, so two worlds hash equal exactly when a replay from either
    /// would produce the same future.
    pub fn state_hash(&self) -> [u8; 32] {
        let mut h = blake3::Hasher::new();
        h.update(DOMAIN);
        put_vec(&mut h, self.gravity());

        put_len(&mut h, self.bodies.slots().len());
        for (index, body) in self.bodies.slots().iter().enumerate() {
            h.update(&[u8::from(self.bodies.is_live(index)), body.kind.tag(), u8::from(body.active)]);
            put_vec(&mut h, body.position);
            put_vec(&mut h, body.velocity);
            put_vec(&mut h, body.force);
            put_scalar(&mut h, body.inverse_mass);
        }

        put_len(&mut h, self.colliders.slots().len());
        for (index, c) in self.colliders.slots().iter().enumerate() {
            h.update(&[u8::from(self.colliders.is_live(index)), c.kind.tag(), u8::from(c.is_trigger)]);
            h.update(&c.body.raw().to_le_bytes());
            h.update(&c.handle.raw().to_le_bytes());
            h.update(&c.shape.raw().to_le_bytes());
            put_vec(&mut h, c.offset);
            put_scalar(&mut h, c.restitution);
            h.update(&c.user_data.to_le_bytes());
        }

        put_len(&mut h, self.boxes.slots().len());
        for b in self.boxes.slots() {
            put_vec(&mut h, b.half_extents);
        }
        put_len(&mut h, self.circles.slots().len());
        for c in self.circles.slots() {
            put_scalar(&mut h, c.radius);
        }
        put_len(&mut h, self.planes.slots().len());
        for p in self.planes.slots() {
            put_vec(&mut h, p.normal);
        }

        let pairs = self.manifold_pairs();
        put_len(&mut h, pairs.len());
        for pair in pairs {
            let (a, b) = pair.canonical();
            h.update(&a.raw().to_le_bytes());
            h.update(&b.raw().to_le_bytes());
            h.update(&[u8::from(self.contact(pair).is_some())]);
        }
        *h.finalize().as_bytes()
    }
}
