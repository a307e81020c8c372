//! Biome ownership and the biome-to-material mapping.

use terravox_geom::Vec3;

use crate::context::TerrainContext;
use crate::sdf;

pub type BiomeId = u16;
pub type MaterialId = u16;

pub const MATERIAL_AIR: MaterialId = 0;
pub const MATERIAL_GRASS: MaterialId = 1;
pub const MATERIAL_DIRT: MaterialId = 2;
/// Reserved: coastline sand never overrides rock.
pub const MATERIAL_ROCK: MaterialId = 3;
pub const MATERIAL_SAND: MaterialId = 4;

/// The feature whose field is smallest (closest / most enclosing) at `p`
/// owns the point. `None` when the world has no features.
pub fn dominant_biome(p: Vec3, ctx: &TerrainContext) -> Option<BiomeId> {
    let mut best: Option<(f32, BiomeId)> = None;
    for (feature, bb) in ctx.features().iter().zip(ctx.feature_bounds()) {
        let s = if bb.contains(p) {
            sdf::evaluate_feature(p, feature, ctx.noise())
        } else {
            sdf::UNBOUNDED_SDF
        };
        match best {
            Some((smallest, _)) if smallest <= s => {}
            _ => best = Some((s, feature.biome_id)),
        }
    }
    best.map(|(_, biome)| biome)
}

/// Material for a sampled node: air when the composed field says air,
/// otherwise the dominant biome shifted by one so material 0 stays free
/// for air. The offset mapping is deliberately simple; a richer table can
/// replace it without touching the resolution logic.
pub fn select_material(p: Vec3, sdf_value: f32, ctx: &TerrainContext) -> MaterialId {
    if sdf_value > 0.0 {
        return MATERIAL_AIR;
    }
    match dominant_biome(p, ctx) {
        Some(biome) => biome + 1,
        None => MATERIAL_AIR,
    }
}
