use proptest::prelude::*;
use terravox_geom::{Vec2, Vec3};
use terravox_world::{Feature, TerrainContext, TerrainSettings, sdf};

fn settings(seed: i32) -> TerrainSettings {
    TerrainSettings {
        voxel_size: 1.0,
        chunk_cells: 16,
        sea_level: 0.0,
        seed,
    }
}

fn arb_point() -> impl Strategy<Value = Vec3> {
    (
        -600.0f32..600.0,
        -100.0f32..400.0,
        -600.0f32..600.0,
    )
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_island() -> impl Strategy<Value = Feature> {
    (
        -200.0f32..200.0,
        -200.0f32..200.0,
        50.0f32..400.0,
        10.0f32..80.0,
    )
        .prop_map(|(cx, cz, r, h)| Feature::base_island(Vec2::new(cx, cz), r, h, 0))
}

fn arb_room() -> impl Strategy<Value = Feature> {
    (
        -300.0f32..300.0,
        0.0f32..80.0,
        -300.0f32..300.0,
        2.0f32..30.0,
    )
        .prop_map(|(cx, cy, cz, r)| {
            Feature::cave_room(Vec3::new(cx, cy, cz), r, 0.0, 0.0, 1.0, 2)
        })
}

proptest! {
    #[test]
    fn below_sea_level_is_always_air(island in arb_island(), seed in 0i32..1000, p in arb_point()) {
        let ctx = TerrainContext::new(settings(seed), vec![island]).unwrap();
        let below = Vec3::new(p.x, -p.y.abs() - 0.001, p.z);
        prop_assert!(sdf::evaluate(below, &ctx) > 0.0);
    }

    #[test]
    fn carving_never_adds_solid(island in arb_island(), room in arb_room(), p in arb_point()) {
        let solid = TerrainContext::new(settings(7), vec![island]).unwrap();
        let carved = TerrainContext::new(settings(7), vec![island, room]).unwrap();
        prop_assert!(sdf::evaluate(p, &carved) >= sdf::evaluate(p, &solid));
    }

    #[test]
    fn union_never_removes_solid(a in arb_island(), b in arb_island(), p in arb_point()) {
        let one = TerrainContext::new(settings(7), vec![a]).unwrap();
        let two = TerrainContext::new(settings(7), vec![a, b]).unwrap();
        prop_assert!(sdf::evaluate(p, &two) <= sdf::evaluate(p, &one));
    }

    #[test]
    fn field_is_deterministic(island in arb_island(), p in arb_point()) {
        let a = TerrainContext::new(settings(99), vec![island]).unwrap();
        let b = TerrainContext::new(settings(99), vec![island]).unwrap();
        prop_assert_eq!(sdf::evaluate(p, &a), sdf::evaluate(p, &b));
    }

    #[test]
    fn feature_field_stays_inside_bounds(island in arb_island(), p in arb_point()) {
        let ctx = TerrainContext::new(settings(3), vec![island]).unwrap();
        let bb = ctx.feature_bounds()[0];
        if !bb.contains(p) {
            // Outside its bounds a lone feature contributes nothing.
            prop_assert!(sdf::evaluate(p, &ctx) >= sdf::UNBOUNDED_SDF || p.y < 0.0);
        }
    }
}
