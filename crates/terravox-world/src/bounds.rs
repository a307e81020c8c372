//! Conservative per-feature bounding boxes and world chunk-grid planning.
//!
//! Bounds are analytic envelopes with safety slack, never tight fits: a box
//! that misses part of a feature shows up as holes in the terrain, while an
//! oversized box only costs some wasted SDF evaluations.

use terravox_geom::{Aabb, Vec2, Vec3};

use crate::context::{TerrainContext, TerrainSettings};
use crate::coords::ChunkCoord;
use crate::feature::{
    BlendMode, CaveRoomParams, CaveTunnelParams, Feature, FeatureKind, IslandParams, LakeParams,
    MountainParams, PlateauParams, RiverParams, VolcanoParams,
};
use crate::sdf;

/// World-space box containing every point where the feature's field can
/// differ from "no effect," padded by two voxels against sampling artifacts.
pub fn feature_bounds(feature: &Feature, settings: &TerrainSettings) -> Aabb {
    let sea = settings.sea_level;
    let bb = match feature.kind {
        FeatureKind::BaseIsland => {
            let p = IslandParams::unpack(feature);
            // Warp can push the coastline outside the nominal radius.
            let horizontal = p.radius * 1.2 + 20.0;
            xz_box(p.center, horizontal, sea, sea + p.max_height)
        }
        FeatureKind::Mountain => {
            let p = MountainParams::unpack(feature);
            let horizontal = p.radius * sdf::mountain::REJECT_FACTOR;
            // Generous vertical envelope; ridged noise never exceeds the
            // clamped height but the slack is cheap.
            xz_box(p.center, horizontal, sea - p.radius, sea + p.height + p.radius)
        }
        FeatureKind::Lake => {
            let p = LakeParams::unpack(feature);
            let horizontal = p.radius + sdf::lake::REJECT_MARGIN;
            // The carve removes everything above the basin bed, however high
            // other features pile terrain there, so the top is unbounded.
            let floor = p.bottom_height.min(p.shore_height);
            xz_box(p.center, horizontal, floor, f32::INFINITY)
        }
        FeatureKind::CityPlateau => {
            let p = PlateauParams::unpack(feature);
            xz_box(p.center, p.radius, sea.min(0.0), p.plateau_height)
        }
        FeatureKind::CaveRoom => {
            let p = CaveRoomParams::unpack(feature);
            Aabb::from_center_half_extents(
                p.center,
                Vec3::splat(p.radius + p.noise_amplitude.max(0.0)),
            )
        }
        FeatureKind::CaveTunnel => {
            let p = CaveTunnelParams::unpack(feature);
            let reach = p.radius + p.noise_amplitude.max(0.0);
            Aabb::new(
                p.start.min(p.end) - Vec3::splat(reach),
                p.start.max(p.end) + Vec3::splat(reach),
            )
        }
        FeatureKind::River => river_bounds(&RiverParams::unpack(feature)),
        FeatureKind::Volcano => {
            let p = VolcanoParams::unpack(feature);
            let horizontal = p.radius * sdf::volcano::REJECT_FACTOR;
            // Top slack covers the rim lip and ridged surface detail.
            let top = p.base_height + p.height * 1.1 + 5.0;
            xz_box(p.center, horizontal, sea.min(0.0) - 5.0, top)
        }
    };
    bb.expanded(settings.voxel_size * 2.0)
}

fn xz_box(center: Vec2, horizontal: f32, min_y: f32, max_y: f32) -> Aabb {
    Aabb::new(
        Vec3::new(center.x - horizontal, min_y, center.y - horizontal),
        Vec3::new(center.x + horizontal, max_y, center.y + horizontal),
    )
}

/// The river's local-frame rectangle (flow along Z, meander along X),
/// rotated into world space corner by corner.
fn river_bounds(r: &RiverParams) -> Aabb {
    let ext_x = r.meander_amplitude + r.width * 2.0;
    let ext_z = r.length * 0.5 + r.width * 2.0;

    let mut min = Vec2::new(f32::MAX, f32::MAX);
    let mut max = Vec2::new(f32::MIN, f32::MIN);
    for corner in [
        Vec2::new(ext_x, ext_z),
        Vec2::new(ext_x, -ext_z),
        Vec2::new(-ext_x, ext_z),
        Vec2::new(-ext_x, -ext_z),
    ] {
        // Inverse of the world-to-local rotation used by the evaluator.
        let world = Vec2::new(
            corner.x * r.cos_rotation + corner.y * r.sin_rotation,
            -corner.x * r.sin_rotation + corner.y * r.cos_rotation,
        );
        min = Vec2::new(min.x.min(world.x), min.y.min(world.y));
        max = Vec2::new(max.x.max(world.x), max.y.max(world.y));
    }

    let low = r.start_height.min(r.end_height) - r.depth * 2.0;
    let high = r.start_height.max(r.end_height) + r.depth * 2.0;
    Aabb::new(
        Vec3::new(r.center.x + min.x, low, r.center.y + min.y),
        Vec3::new(r.center.x + max.x, high, r.center.y + max.y),
    )
}

/// Inclusive chunk-coordinate range the authored features require.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldExtents {
    pub min_chunk: ChunkCoord,
    pub max_chunk: ChunkCoord,
}

impl WorldExtents {
    /// Chunk counts per axis.
    pub fn chunk_counts(&self) -> (i64, i64, i64) {
        (
            i64::from(self.max_chunk.x - self.min_chunk.x) + 1,
            i64::from(self.max_chunk.y - self.min_chunk.y) + 1,
            i64::from(self.max_chunk.z - self.min_chunk.z) + 1,
        )
    }

    pub fn chunk_count(&self) -> u64 {
        let (x, y, z) = self.chunk_counts();
        (x * y * z) as u64
    }

    /// Every chunk coordinate in the range, row-major.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + use<> {
        let min = self.min_chunk;
        let max = self.max_chunk;
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| ChunkCoord::new(x, y, z)))
        })
    }
}

/// Union of the bounds of every solid-adding feature.
///
/// Only Union features contribute: a Subtract feature can never place solid
/// outside the volume some Union feature already claims (the lake's
/// unbounded-top carve box would otherwise blow the grid up).
fn solid_union_bounds(ctx: &TerrainContext) -> Option<Aabb> {
    let mut solid: Option<Aabb> = None;
    for (feature, bb) in ctx.features().iter().zip(ctx.feature_bounds()) {
        if feature.blend != BlendMode::Union {
            continue;
        }
        solid = Some(match solid {
            Some(acc) => acc.union(*bb),
            None => *bb,
        });
    }
    solid
}

/// Solid-feature union bounds converted to a chunk index range. A world with
/// no solid features falls back to a single column of three chunks around
/// the origin so callers always have something to generate.
pub fn plan_world_extents(ctx: &TerrainContext) -> WorldExtents {
    match solid_union_bounds(ctx) {
        Some(bb) => {
            let min_chunk = ChunkCoord::from_world(bb.min, &ctx.settings);
            let max_chunk = ChunkCoord::from_world(bb.max, &ctx.settings);
            WorldExtents {
                min_chunk,
                max_chunk,
            }
        }
        None => WorldExtents {
            min_chunk: ChunkCoord::new(0, -1, 0),
            max_chunk: ChunkCoord::new(0, 1, 0),
        },
    }
}

/// Probe columns per horizontal axis for the vertical-envelope refinement.
const PROBE_COLUMNS: usize = 16;
/// Coarse top-down samples per probe column.
const PROBE_COARSE_STEPS: usize = 32;
/// Binary-search iterations refining the bracketed surface crossing.
const PROBE_REFINE_STEPS: usize = 10;

/// Highest solid height in one vertical column, or `None` when every sample
/// is air. A coarse top-down march brackets the surface, then a short binary
/// search tightens the bracket.
fn probe_column_surface(
    ctx: &TerrainContext,
    x: f32,
    z: f32,
    y_min: f32,
    y_max: f32,
) -> Option<f32> {
    let step = (y_max - y_min) / PROBE_COARSE_STEPS as f32;
    if !(step > 0.0 && step.is_finite()) {
        return None;
    }
    let mut air_above = None;
    let mut solid = None;
    for i in 0..=PROBE_COARSE_STEPS {
        let y = y_max - step * i as f32;
        if sdf::evaluate(Vec3::new(x, y, z), ctx) < 0.0 {
            solid = Some(y);
            break;
        }
        air_above = Some(y);
    }
    let mut lo = solid?;
    // Solid at the very top sample: the bracket is degenerate, report as-is.
    let Some(mut hi) = air_above else {
        return Some(lo);
    };
    for _ in 0..PROBE_REFINE_STEPS {
        let mid = (lo + hi) * 0.5;
        if sdf::evaluate(Vec3::new(x, mid, z), ctx) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(lo)
}

/// Highest terrain surface any probe column finds over the horizontal extent
/// of `bb`, or `None` when all columns come up air. Columns sample at cell
/// centers of a `PROBE_COLUMNS^2` grid, so isolated spires thinner than a
/// probe cell can slip through; callers must treat this as a refinement of
/// the analytic envelope, not a replacement.
pub fn probe_surface_ceiling(ctx: &TerrainContext, bb: Aabb) -> Option<f32> {
    let span_x = bb.max.x - bb.min.x;
    let span_z = bb.max.z - bb.min.z;
    let mut ceiling: Option<f32> = None;
    for j in 0..PROBE_COLUMNS {
        for i in 0..PROBE_COLUMNS {
            let x = bb.min.x + span_x * (i as f32 + 0.5) / PROBE_COLUMNS as f32;
            let z = bb.min.z + span_z * (j as f32 + 0.5) / PROBE_COLUMNS as f32;
            if let Some(h) = probe_column_surface(ctx, x, z, bb.min.y, bb.max.y) {
                ceiling = Some(match ceiling {
                    Some(best) => best.max(h),
                    None => h,
                });
            }
        }
    }
    ceiling
}

/// `plan_world_extents` with the top of the grid lowered to the probed
/// surface ceiling. The analytic vertical bounds carry noise slack that often
/// rounds up to whole bands of all-air chunks; probing trims those bands while
/// the analytic envelope still backstops the floor and the footprint.
pub fn plan_world_extents_probed(ctx: &TerrainContext) -> WorldExtents {
    let base = plan_world_extents(ctx);
    let Some(bb) = solid_union_bounds(ctx) else {
        return base;
    };
    let Some(ceiling) = probe_surface_ceiling(ctx, bb) else {
        return base;
    };
    let pad = ctx.settings.voxel_size * 2.0;
    let probe_top = Vec3::new(bb.min.x, ceiling + pad, bb.min.z);
    let top = ChunkCoord::from_world(probe_top, &ctx.settings)
        .y
        .clamp(base.min_chunk.y, base.max_chunk.y);
    log::debug!(
        "probed surface ceiling {ceiling:.1} trims vertical chunks {}..={} to {}..={}",
        base.min_chunk.y,
        base.max_chunk.y,
        base.min_chunk.y,
        top,
    );
    WorldExtents {
        min_chunk: base.min_chunk,
        max_chunk: ChunkCoord::new(base.max_chunk.x, top, base.max_chunk.z),
    }
}
