//! Per-feature signed distance evaluators and the composition engine.
//!
//! Convention throughout: negative = inside solid terrain, positive = air.
//! Evaluators return approximate fields, not exact distances; downstream
//! consumers only rely on sign and relative ordering.

use terravox_geom::Vec3;

use crate::context::TerrainContext;
use crate::feature::{
    BlendMode, CaveRoomParams, CaveTunnelParams, Feature, FeatureKind, IslandParams, LakeParams,
    MountainParams, PlateauParams, RiverParams, VolcanoParams,
};
use crate::noise::NoiseField;

mod cave;
mod island;
pub(crate) mod lake;
pub(crate) mod mountain;
mod plateau;
mod river;
pub(crate) mod volcano;

/// "No effect" sentinel: far enough into air that min/max composition ignores it.
pub const UNBOUNDED_SDF: f32 = 9999.0;

/// Distance field of a single feature at a world point.
pub fn evaluate_feature(p: Vec3, feature: &Feature, noise: &NoiseField) -> f32 {
    match feature.kind {
        FeatureKind::BaseIsland => island::evaluate(p, &IslandParams::unpack(feature), noise),
        FeatureKind::Mountain => mountain::evaluate(p, &MountainParams::unpack(feature), noise),
        FeatureKind::Lake => lake::evaluate(p, &LakeParams::unpack(feature)),
        FeatureKind::CityPlateau => plateau::evaluate(p, &PlateauParams::unpack(feature)),
        FeatureKind::CaveRoom => cave::room(p, &CaveRoomParams::unpack(feature), noise),
        FeatureKind::CaveTunnel => cave::tunnel(p, &CaveTunnelParams::unpack(feature), noise),
        FeatureKind::River => river::evaluate(p, &RiverParams::unpack(feature), noise),
        FeatureKind::Volcano => volcano::evaluate(p, &VolcanoParams::unpack(feature), noise),
    }
}

#[inline]
fn fold(accumulator: f32, s: f32, blend: BlendMode) -> f32 {
    match blend {
        BlendMode::Union => accumulator.min(s),
        BlendMode::Subtract => accumulator.max(-s),
    }
}

/// Composed terrain field over every active feature.
///
/// Points below sea level short-circuit to air; water is not solid terrain.
/// Feature bounds are checked before evaluating the (noise-heavy) field.
pub fn evaluate(p: Vec3, ctx: &TerrainContext) -> f32 {
    if p.y < ctx.settings.sea_level {
        return UNBOUNDED_SDF;
    }
    let mut acc = UNBOUNDED_SDF;
    for (feature, bounds) in ctx.features().iter().zip(ctx.feature_bounds()) {
        if !bounds.contains(p) {
            continue;
        }
        let s = evaluate_feature(p, feature, ctx.noise());
        acc = fold(acc, s, feature.blend);
    }
    acc
}

/// Same composition restricted to a pre-filtered feature subset, used by the
/// chunk sampler after chunk-vs-feature bounds culling.
pub fn evaluate_subset(p: Vec3, ctx: &TerrainContext, indices: &[usize]) -> f32 {
    if p.y < ctx.settings.sea_level {
        return UNBOUNDED_SDF;
    }
    let features = ctx.features();
    let bounds = ctx.feature_bounds();
    let mut acc = UNBOUNDED_SDF;
    for &i in indices {
        if !bounds[i].contains(p) {
            continue;
        }
        let s = evaluate_feature(p, &features[i], ctx.noise());
        acc = fold(acc, s, features[i].blend);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{TerrainContext, TerrainSettings};
    use terravox_geom::Vec2;

    fn settings() -> TerrainSettings {
        TerrainSettings {
            voxel_size: 1.0,
            chunk_cells: 16,
            sea_level: 0.0,
            seed: 1337,
        }
    }

    fn ctx_with(features: Vec<Feature>) -> TerrainContext {
        TerrainContext::new(settings(), features).unwrap()
    }

    #[test]
    fn below_sea_level_is_air() {
        let ctx = ctx_with(vec![Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0)]);
        for y in [-0.5f32, -10.0, -500.0] {
            assert!(evaluate(Vec3::new(0.0, y, 0.0), &ctx) > 0.0);
        }
    }

    #[test]
    fn island_solid_at_base_air_above() {
        let ctx = ctx_with(vec![Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0)]);
        assert!(evaluate(Vec3::new(0.0, 1.0, 0.0), &ctx) < 0.0);
        assert!(evaluate(Vec3::new(0.0, 300.0, 0.0), &ctx) > 0.0);
    }

    #[test]
    fn mountain_scenario_origin_solid_sky_air() {
        let ctx = ctx_with(vec![Feature::mountain(
            Vec2::ZERO,
            150.0,
            120.0,
            0.05,
            8.0,
            4.0,
            7.0,
            1,
        )]);
        assert!(evaluate(Vec3::new(0.0, 0.0, 0.0), &ctx) < 0.0);
        assert!(evaluate(Vec3::new(0.0, 500.0, 0.0), &ctx) > 100.0);
    }

    #[test]
    fn distant_feature_does_not_change_field() {
        let probe = Vec3::new(0.0, 5.0, 0.0);
        let near = ctx_with(vec![Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0)]);
        let base = evaluate(probe, &near);
        let far = ctx_with(vec![
            Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0),
            Feature::mountain(Vec2::new(1.0e5, 1.0e5), 150.0, 120.0, 0.05, 8.0, 4.0, 7.0, 1),
        ]);
        assert_eq!(base, evaluate(probe, &far));
    }

    #[test]
    fn subtract_forces_air_inside_never_touches_outside() {
        let island = Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0);
        let room = Feature::cave_room(Vec3::new(0.0, 10.0, 0.0), 8.0, 0.0, 0.0, 3.0, 2);

        let solid_only = ctx_with(vec![island]);
        let carved = ctx_with(vec![island, room]);

        // Inside the carved sphere the field strictly increases toward air.
        let inside = Vec3::new(0.0, 10.0, 0.0);
        assert!(evaluate(inside, &solid_only) < 0.0);
        assert!(evaluate(inside, &carved) > evaluate(inside, &solid_only));
        assert!(evaluate(inside, &carved) > 0.0);

        // Outside the sphere (still on the island) the field is unchanged.
        let outside = Vec3::new(50.0, 1.0, 50.0);
        assert_eq!(evaluate(outside, &solid_only), evaluate(outside, &carved));
    }

    #[test]
    fn lake_carves_basin_into_island() {
        let island = Feature::base_island(Vec2::ZERO, 400.0, 60.0, 0);
        let lake = Feature::lake(Vec2::new(50.0, 0.0), 60.0, 5.0, 12.0, 3);
        let ctx = ctx_with(vec![island, lake]);
        // Above the lake bed at the lake center: carved to air.
        assert!(evaluate(Vec3::new(50.0, 20.0, 0.0), &ctx) > 0.0);
        // Below the bed the island is still solid.
        assert!(evaluate(Vec3::new(50.0, 2.0, 0.0), &ctx) < 0.0);
    }

    #[test]
    fn plateau_adds_flat_disc() {
        let ctx = ctx_with(vec![Feature::city_plateau(Vec2::ZERO, 80.0, 25.0, 4)]);
        assert!(evaluate(Vec3::new(0.0, 20.0, 0.0), &ctx) < 0.0);
        assert!(evaluate(Vec3::new(0.0, 30.0, 0.0), &ctx) > 0.0);
        // Fades out toward the edge.
        assert!(evaluate(Vec3::new(79.0, 20.0, 0.0), &ctx) > 0.0);
    }

    #[test]
    fn tunnel_carves_capsule() {
        let island = Feature::base_island(Vec2::ZERO, 300.0, 50.0, 0);
        let tunnel = Feature::cave_tunnel(
            Vec3::new(-40.0, 8.0, 0.0),
            Vec3::new(40.0, 8.0, 0.0),
            5.0,
            0.0,
            0.0,
            11.0,
            2,
        );
        let ctx = ctx_with(vec![island, tunnel]);
        assert!(evaluate(Vec3::new(0.0, 8.0, 0.0), &ctx) > 0.0);
        assert!(evaluate(Vec3::new(0.0, 8.0, 30.0), &ctx) < 0.0);
    }

    #[test]
    fn subset_matches_full_when_all_selected() {
        let features = vec![
            Feature::base_island(Vec2::ZERO, 200.0, 40.0, 0),
            Feature::mountain(Vec2::new(30.0, 30.0), 100.0, 80.0, 0.05, 8.0, 4.0, 7.0, 1),
        ];
        let ctx = ctx_with(features);
        let all: Vec<usize> = (0..ctx.features().len()).collect();
        for p in [
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(30.0, 50.0, 30.0),
            Vec3::new(-80.0, 2.0, 10.0),
        ] {
            assert_eq!(evaluate(p, &ctx), evaluate_subset(p, &ctx, &all));
        }
    }
}
