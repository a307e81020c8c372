//! Sub-voxel block mesher.
//!
//! Each coarse cell is split into `div^3` micro cells; a micro cell is solid
//! when the trilinear interpolation of the coarse corner densities at its
//! center is positive. Faces are emitted against air micro cells, including
//! across coarse-cell boundaries, so the micro surface is watertight within
//! the chunk. Micro cells beyond the chunk count as air.

use std::collections::HashMap;

use terravox_chunk::ChunkBuf;
use terravox_geom::Vec3;
use terravox_world::{MaterialId, material};

use crate::face::ALL_FACES;
use crate::mesh_build::MeshBuild;

pub fn mesh_micro_blocks(
    buf: &ChunkBuf,
    voxel_size: f32,
    subdivisions: u32,
    parts: &mut HashMap<MaterialId, MeshBuild>,
) {
    let div = subdivisions.max(1) as usize;
    let cells = buf.cells;
    let micro_n = cells * div;
    let micro_size = voxel_size / div as f32;
    let origin = crate::chunk_origin(buf, voxel_size);

    // Interpolated density at every micro-cell center, chunk-wide, so
    // neighbor tests across coarse-cell boundaries are plain array reads.
    let mut solid = vec![false; micro_n * micro_n * micro_n];
    let midx = |x: usize, y: usize, z: usize| (z * micro_n + y) * micro_n + x;
    for mz in 0..micro_n {
        for my in 0..micro_n {
            for mx in 0..micro_n {
                solid[midx(mx, my, mz)] = micro_density(buf, div, mx, my, mz) > 0.0;
            }
        }
    }

    let is_solid = |x: i64, y: i64, z: i64| {
        let n = micro_n as i64;
        if x < 0 || y < 0 || z < 0 || x >= n || y >= n || z >= n {
            return false;
        }
        solid[midx(x as usize, y as usize, z as usize)]
    };

    for mz in 0..micro_n {
        for my in 0..micro_n {
            for mx in 0..micro_n {
                if !solid[midx(mx, my, mz)] {
                    continue;
                }
                let base = origin
                    + Vec3::new(mx as f32, my as f32, mz as f32) * micro_size;
                let mat = cell_material(buf, mx / div, my / div, mz / div);
                for face in ALL_FACES {
                    let (dx, dy, dz) = face.delta();
                    if is_solid(
                        mx as i64 + dx as i64,
                        my as i64 + dy as i64,
                        mz as i64 + dz as i64,
                    ) {
                        continue;
                    }
                    parts
                        .entry(mat)
                        .or_default()
                        .add_cube_face(face, base, micro_size);
                }
            }
        }
    }
}

/// Trilinear density at the center of micro cell `(mx, my, mz)`.
fn micro_density(buf: &ChunkBuf, div: usize, mx: usize, my: usize, mz: usize) -> f32 {
    let (cx, cy, cz) = (mx / div, my / div, mz / div);
    let frac = |m: usize| ((m % div) as f32 + 0.5) / div as f32;
    let (fx, fy, fz) = (frac(mx), frac(my), frac(mz));

    let d = |ox: usize, oy: usize, oz: usize| {
        buf.get_local(cx + ox, cy + oy, cz + oz).density as f32
    };
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

    let x00 = lerp(d(0, 0, 0), d(1, 0, 0), fx);
    let x10 = lerp(d(0, 1, 0), d(1, 1, 0), fx);
    let x01 = lerp(d(0, 0, 1), d(1, 0, 1), fx);
    let x11 = lerp(d(0, 1, 1), d(1, 1, 1), fx);
    let y0 = lerp(x00, x10, fy);
    let y1 = lerp(x01, x11, fy);
    lerp(y0, y1, fz)
}

/// Most frequent material among the cell's solid corners; grass when the
/// cell is solid only through interpolation.
fn cell_material(buf: &ChunkBuf, cx: usize, cy: usize, cz: usize) -> MaterialId {
    let mut counts: [(MaterialId, u8); 8] = [(0, 0); 8];
    let mut used = 0;
    for oz in 0..2 {
        for oy in 0..2 {
            for ox in 0..2 {
                let v = buf.get_local(cx + ox, cy + oy, cz + oz);
                if !v.is_solid() {
                    continue;
                }
                if let Some(slot) = counts[..used].iter_mut().find(|(m, _)| *m == v.material) {
                    slot.1 += 1;
                } else {
                    counts[used] = (v.material, 1);
                    used += 1;
                }
            }
        }
    }
    counts[..used]
        .iter()
        .max_by_key(|&&(m, c)| (c, std::cmp::Reverse(m)))
        .map(|&(m, _)| m)
        .unwrap_or(material::MATERIAL_GRASS)
}
