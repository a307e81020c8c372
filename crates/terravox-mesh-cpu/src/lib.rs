//! CPU meshing crate: the mesh-extraction family over sampled chunk grids.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use terravox_chunk::ChunkBuf;
use terravox_geom::{Aabb, Vec3};
use terravox_world::{ChunkCoord, MaterialId, TerrainContext, material};

mod block;
mod face;
mod marching;
mod mesh_build;
mod micro;
mod quantize;
pub mod tables;

pub use block::mesh_blocks;
pub use face::{ALL_FACES, Face};
pub use marching::march_chunk;
pub use mesh_build::MeshBuild;
pub use micro::mesh_micro_blocks;
pub use quantize::quantize_triangles;

/// How chunk grids are turned into triangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshMode {
    /// One cube per solid voxel, hidden faces removed.
    Blocks,
    /// Smooth isosurface through the density zero crossing.
    MarchingCubes,
    /// Marching cubes snapped to a half-voxel lattice.
    SmoothedBlocks,
    /// Marching cubes snapped to the full voxel lattice.
    HybridBlocks,
    /// Cubes at sub-voxel resolution from interpolated density.
    MicroBlocks { subdivisions: u32 },
}

/// Finished mesh for one chunk, split per material.
pub struct ChunkMeshCPU {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub parts: HashMap<MaterialId, MeshBuild>,
}

impl ChunkMeshCPU {
    pub fn is_empty(&self) -> bool {
        self.parts.values().all(|m| m.is_empty())
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.values().map(|m| m.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.values().map(|m| m.triangle_count()).sum()
    }
}

/// World-space minimum corner of the chunk's grid.
pub(crate) fn chunk_origin(buf: &ChunkBuf, voxel_size: f32) -> Vec3 {
    let size = voxel_size * buf.cells as f32;
    Vec3::new(
        buf.coord.x as f32 * size,
        buf.coord.y as f32 * size,
        buf.coord.z as f32 * size,
    )
}

/// Extracts the chunk surface with the requested mode. The marching-cubes
/// family keys the whole chunk under its most frequent solid material; the
/// block meshers keep per-voxel materials.
///
/// `ctx` lets the block mesher resolve neighbors beyond the grid against the
/// terrain field and apply the shoreline material override; `None` falls
/// back to treating out-of-grid neighbors as solid.
pub fn extract_chunk_mesh(
    buf: &ChunkBuf,
    voxel_size: f32,
    ctx: Option<&TerrainContext>,
    mode: MeshMode,
) -> ChunkMeshCPU {
    let origin = chunk_origin(buf, voxel_size);
    let bbox = Aabb::new(
        origin,
        origin + Vec3::splat(voxel_size * buf.cells as f32),
    );
    let mut parts: HashMap<MaterialId, MeshBuild> = HashMap::new();

    if buf.has_solid() {
        match mode {
            MeshMode::Blocks => mesh_blocks(buf, voxel_size, ctx, &mut parts),
            MeshMode::MarchingCubes => {
                let mut mesh = MeshBuild::default();
                march_chunk(buf, voxel_size, &mut mesh);
                if !mesh.is_empty() {
                    parts.insert(dominant_material(buf), mesh);
                }
            }
            MeshMode::SmoothedBlocks => {
                quantized_march(buf, voxel_size, voxel_size * 0.5, &mut parts);
            }
            MeshMode::HybridBlocks => {
                quantized_march(buf, voxel_size, voxel_size, &mut parts);
            }
            MeshMode::MicroBlocks { subdivisions } => {
                mesh_micro_blocks(buf, voxel_size, subdivisions, &mut parts);
            }
        }
    }

    log::trace!(
        "meshed chunk {} ({:?}): {} verts, {} tris",
        buf.coord,
        mode,
        parts.values().map(|m| m.vertex_count()).sum::<usize>(),
        parts.values().map(|m| m.triangle_count()).sum::<usize>(),
    );
    ChunkMeshCPU {
        coord: buf.coord,
        bbox,
        parts,
    }
}

fn quantized_march(
    buf: &ChunkBuf,
    voxel_size: f32,
    step: f32,
    parts: &mut HashMap<MaterialId, MeshBuild>,
) {
    let mut raw = MeshBuild::default();
    march_chunk(buf, voxel_size, &mut raw);
    let mut snapped = MeshBuild::default();
    quantize_triangles(&raw, step, &mut snapped);
    if !snapped.is_empty() {
        parts.insert(dominant_material(buf), snapped);
    }
}

/// Most frequent material among solid nodes; ties break toward the smaller
/// id, an all-air grid yields grass.
pub fn dominant_material(buf: &ChunkBuf) -> MaterialId {
    let mut counts: HashMap<MaterialId, usize> = HashMap::new();
    for v in &buf.voxels {
        if v.is_solid() {
            *counts.entry(v.material).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(m, c)| (c, std::cmp::Reverse(m)))
        .map(|(m, _)| m)
        .unwrap_or(material::MATERIAL_GRASS)
}
