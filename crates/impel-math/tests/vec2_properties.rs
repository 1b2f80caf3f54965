// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use impel_math::{DFix64, F32Scalar, Scalar, Vec2};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite", |v| v.is_finite() && v.abs() < 1.0e4)
}

proptest! {
    #[test]
    fn normalize_never_produces_nan(x in finite(), y in finite()) {
        let v = Vec2::<F32Scalar>::from_f32(x, y);
        let n = v.normalize_or(Vec2::up());
        let [nx, ny] = n.to_f32_array();
        prop_assert!(nx.is_finite() && ny.is_finite());
        let len = n.length().to_f32();
        prop_assert!((len - 1.0).abs() < 1.0e-3, "len={len}");
    }

    #[test]
    fn fixed_sqrt_is_a_floor_root(x in 0.0_f32..1.0e4) {
        let v = DFix64::from_f32(x);
        let r = v.sqrt();
        prop_assert!(r * r <= v);
        let next = DFix64::from_raw(r.raw() + 1);
        // One resolution step above the root overshoots (allowing mul rounding).
        prop_assert!(next * next >= v);
    }

    #[test]
    fn dot_is_symmetric_on_both_lanes(ax in finite(), ay in finite(), bx in finite(), by in finite()) {
        let a = Vec2::<F32Scalar>::from_f32(ax, ay);
        let b = Vec2::<F32Scalar>::from_f32(bx, by);
        prop_assert_eq!(a.dot(b), b.dot(a));
        let fa = Vec2::<DFix64>::from_f32(ax, ay);
        let fb = Vec2::<DFix64>::from_f32(bx, by);
        prop_assert_eq!(fa.dot(fb), fb.dot(fa));
    }
}

#[test]
fn lanes_agree_on_simple_kinematics() {
    fn integrate<S: Scalar>() -> [f32; 2] {
        let dt = S::from_f32(0.5);
        let mut p = Vec2::<S>::zero();
        let v = Vec2::<S>::from_f32(2.0, -4.0);
        for _ in 0..4 {
            p += v * dt;
        }
        p.to_f32_array()
    }
    assert_eq!(integrate::<F32Scalar>(), [4.0, -8.0]);
    assert_eq!(integrate::<DFix64>(), [4.0, -8.0]);
}
