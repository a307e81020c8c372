use proptest::prelude::*;
use proptest::strategy::Strategy;
use terravox_geom::{Aabb, Vec3, lerp, saturate, smoothstep};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    (-1.0e5f32..1.0e5f32).prop_filter("finite", |v| v.is_finite())
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn vec3_add_commutative(a in arb_vec3(), b in arb_vec3()) {
        let lhs = a + b;
        let rhs = b + a;
        prop_assert!(approx(lhs.x, rhs.x, 1e-3));
        prop_assert!(approx(lhs.y, rhs.y, 1e-3));
        prop_assert!(approx(lhs.z, rhs.z, 1e-3));
    }

    #[test]
    fn vec3_cross_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length();
        prop_assert!(c.dot(a).abs() <= 1e-2 * scale.max(1.0) * a.length().max(1.0));
        prop_assert!(c.dot(b).abs() <= 1e-2 * scale.max(1.0) * b.length().max(1.0));
    }

    #[test]
    fn aabb_union_contains_both(a in arb_vec3(), b in arb_vec3(), c in arb_vec3(), d in arb_vec3()) {
        let box1 = Aabb::new(a.min(b), a.max(b));
        let box2 = Aabb::new(c.min(d), c.max(d));
        let u = box1.union(box2);
        prop_assert!(u.contains(box1.min) && u.contains(box1.max));
        prop_assert!(u.contains(box2.min) && u.contains(box2.max));
    }

    #[test]
    fn aabb_expanded_still_intersects(a in arb_vec3(), b in arb_vec3(), m in 0.0f32..100.0) {
        let bb = Aabb::new(a.min(b), a.max(b));
        prop_assert!(bb.expanded(m).intersects(bb));
    }

    #[test]
    fn lerp_endpoints(a in bounded_f32(), b in bounded_f32()) {
        prop_assert!(approx(lerp(a, b, 0.0), a, 1e-3));
        prop_assert!(approx(lerp(a, b, 1.0), b, 1e-3));
    }

    #[test]
    fn smoothstep_in_unit_range(e0 in -100.0f32..0.0, e1 in 0.1f32..100.0, x in -200.0f32..200.0) {
        let v = smoothstep(e0, e1, x);
        prop_assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn saturate_clamps() {
    assert_eq!(saturate(-0.5), 0.0);
    assert_eq!(saturate(0.25), 0.25);
    assert_eq!(saturate(2.0), 1.0);
}
