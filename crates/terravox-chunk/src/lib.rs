//! Padded voxel grid and the per-chunk density sampling pass.
#![forbid(unsafe_code)]

use terravox_geom::Vec3;
use terravox_world::{ChunkCoord, MaterialId, TerrainContext, material, sdf};

/// Quantization factor from signed distance to integer density. Higher values
/// resolve the surface more finely at the cost of a smaller representable
/// distance range.
pub const DENSITY_SCALE: f32 = 64.0;

/// One sampled grid node. Positive density = solid, the rest is air;
/// material 0 is reserved for air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Voxel {
    pub density: i16,
    pub material: MaterialId,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        density: i16::MIN,
        material: 0,
    };

    #[inline]
    pub fn is_solid(self) -> bool {
        self.density > 0
    }
}

/// Signed distance to quantized density: solid (negative sdf) maps to
/// positive density, saturating at the i16 range.
#[inline]
pub fn density_from_sdf(sdf: f32) -> i16 {
    (-sdf * DENSITY_SCALE).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Dense node grid for one chunk: `(cells + 1)^3` samples so every cell owns
/// its 8 corners without consulting neighboring chunks.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    /// Cells per axis; nodes per axis is `cells + 1`.
    pub cells: usize,
    pub voxels: Vec<Voxel>,
}

impl ChunkBuf {
    pub fn new_air(coord: ChunkCoord, cells: usize) -> Self {
        let nodes = cells + 1;
        Self {
            coord,
            cells,
            voxels: vec![Voxel::AIR; nodes * nodes * nodes],
        }
    }

    #[inline]
    pub fn nodes_per_axis(&self) -> usize {
        self.cells + 1
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        let n = self.nodes_per_axis();
        (z * n + y) * n + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, v: Voxel) {
        let i = self.idx(x, y, z);
        self.voxels[i] = v;
    }

    #[inline]
    pub fn has_solid(&self) -> bool {
        self.voxels.iter().any(|v| v.is_solid())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_solid()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_solid(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
}

/// Fills the padded grid for one chunk: every node is an independent field
/// evaluation, so the loop has no cross-node dependencies and any traversal
/// order produces the same buffer.
///
/// Features are culled once against the chunk box (padded by a voxel so edge
/// nodes still see features that barely touch the chunk), then every node
/// samples only the surviving subset.
pub fn generate_chunk_voxels(ctx: &TerrainContext, coord: ChunkCoord) -> ChunkGenerateResult {
    let settings = &ctx.settings;
    let cells = settings.chunk_cells;
    let nodes = cells + 1;
    let origin = coord.origin(settings);
    let active = ctx.features_for_aabb(coord.aabb(settings).expanded(settings.voxel_size));

    let mut buf = ChunkBuf::new_air(coord, cells);
    if active.is_empty() {
        // Nothing in range can place solid here.
        return ChunkGenerateResult {
            buf,
            occupancy: ChunkOccupancy::Empty,
        };
    }

    let mut has_solid = false;
    for z in 0..nodes {
        for y in 0..nodes {
            for x in 0..nodes {
                let world =
                    origin + Vec3::new(x as f32, y as f32, z as f32) * settings.voxel_size;
                let s = sdf::evaluate_subset(world, ctx, &active);
                let density = density_from_sdf(s);
                let material = if density > 0 {
                    has_solid = true;
                    material::select_material(world, s, ctx)
                } else {
                    material::MATERIAL_AIR
                };
                buf.set_local(x, y, z, Voxel { density, material });
            }
        }
    }

    let occupancy = if has_solid {
        ChunkOccupancy::Populated
    } else {
        ChunkOccupancy::Empty
    };
    log::trace!(
        "generated chunk {} ({} features in range, {:?})",
        coord,
        active.len(),
        occupancy
    );
    ChunkGenerateResult { buf, occupancy }
}
