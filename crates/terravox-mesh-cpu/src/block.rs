//! Cube-per-voxel mesher with hidden-face removal.

use std::collections::HashMap;

use terravox_chunk::ChunkBuf;
use terravox_geom::Vec3;
use terravox_world::{MaterialId, TerrainContext, material, sdf};

use crate::face::{ALL_FACES, Face};
use crate::mesh_build::MeshBuild;

/// Shoreline falloff: sand wins while `exp(-height_above_sea / 3)` is still
/// above one half, roughly the first two voxels over the waterline.
const SAND_FALLOFF_SCALE: f32 = 3.0;

/// Emits one cube per solid voxel, skipping faces whose neighbor is also
/// solid. Neighbors outside the grid are resolved against the terrain field
/// when `ctx` is present; without it they count as solid, so boundary faces
/// at the chunk seam are suppressed rather than doubled.
pub fn mesh_blocks(
    buf: &ChunkBuf,
    voxel_size: f32,
    ctx: Option<&TerrainContext>,
    parts: &mut HashMap<MaterialId, MeshBuild>,
) {
    let cells = buf.cells as i32;
    let origin = crate::chunk_origin(buf, voxel_size);

    for z in 0..cells {
        for y in 0..cells {
            for x in 0..cells {
                let v = buf.get_local(x as usize, y as usize, z as usize);
                if !v.is_solid() {
                    continue;
                }
                let base =
                    origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
                let mat = surface_material(v.material, base, voxel_size, ctx);

                for face in ALL_FACES {
                    if neighbor_is_solid(buf, ctx, voxel_size, base, x, y, z, face) {
                        continue;
                    }
                    parts.entry(mat).or_default().add_cube_face(face, base, voxel_size);
                }
            }
        }
    }
}

fn neighbor_is_solid(
    buf: &ChunkBuf,
    ctx: Option<&TerrainContext>,
    voxel_size: f32,
    base: Vec3,
    x: i32,
    y: i32,
    z: i32,
    face: Face,
) -> bool {
    let (dx, dy, dz) = face.delta();
    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
    let nodes = buf.cells as i32 + 1;
    if (0..nodes).contains(&nx) && (0..nodes).contains(&ny) && (0..nodes).contains(&nz) {
        return buf
            .get_local(nx as usize, ny as usize, nz as usize)
            .is_solid();
    }
    match ctx {
        Some(ctx) => {
            let center = base
                + Vec3::new(
                    (dx as f32 + 0.5) * voxel_size,
                    (dy as f32 + 0.5) * voxel_size,
                    (dz as f32 + 0.5) * voxel_size,
                );
            sdf::evaluate(center, ctx) < 0.0
        }
        None => true,
    }
}

/// Sampled material, with the shoreline override: near sea level exposed
/// ground turns to sand unless it is rock.
fn surface_material(
    mat: MaterialId,
    base: Vec3,
    voxel_size: f32,
    ctx: Option<&TerrainContext>,
) -> MaterialId {
    let Some(ctx) = ctx else {
        return mat;
    };
    if mat == material::MATERIAL_ROCK || mat == material::MATERIAL_AIR {
        return mat;
    }
    let center_y = base.y + 0.5 * voxel_size;
    let above = (center_y - ctx.settings.sea_level).max(0.0);
    if (-above / SAND_FALLOFF_SCALE).exp() > 0.5 {
        material::MATERIAL_SAND
    } else {
        mat
    }
}
