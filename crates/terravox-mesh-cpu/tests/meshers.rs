use proptest::prelude::*;

use terravox_chunk::{ChunkBuf, Voxel, density_from_sdf};
use terravox_geom::Vec3;
use terravox_mesh_cpu::{ChunkMeshCPU, MeshMode, extract_chunk_mesh};
use terravox_world::{ChunkCoord, material};

const CELLS: usize = 8;
const VOXEL: f32 = 1.0;

fn air_buf(coord: ChunkCoord) -> ChunkBuf {
    ChunkBuf::new_air(coord, CELLS)
}

fn solid_buf(coord: ChunkCoord, mat: u16) -> ChunkBuf {
    let mut buf = air_buf(coord);
    let n = buf.nodes_per_axis();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                buf.set_local(
                    x,
                    y,
                    z,
                    Voxel {
                        density: i16::MAX,
                        material: mat,
                    },
                );
            }
        }
    }
    buf
}

/// Fills the grid from a sphere of radius `r` centered at `center` in
/// chunk-local node units.
fn sphere_buf(coord: ChunkCoord, center: Vec3, r: f32) -> ChunkBuf {
    let mut buf = air_buf(coord);
    let n = buf.nodes_per_axis();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let p = Vec3::new(x as f32, y as f32, z as f32);
                let sdf = (p - center).length() - r;
                let density = density_from_sdf(sdf);
                buf.set_local(
                    x,
                    y,
                    z,
                    Voxel {
                        density,
                        material: if density > 0 { 1 } else { 0 },
                    },
                );
            }
        }
    }
    buf
}

fn all_modes() -> [MeshMode; 5] {
    [
        MeshMode::Blocks,
        MeshMode::MarchingCubes,
        MeshMode::SmoothedBlocks,
        MeshMode::HybridBlocks,
        MeshMode::MicroBlocks { subdivisions: 2 },
    ]
}

#[test]
fn all_air_chunk_meshes_empty_in_every_mode() {
    for mode in all_modes() {
        let mesh = extract_chunk_mesh(&air_buf(ChunkCoord::new(0, 0, 0)), VOXEL, None, mode);
        assert!(mesh.is_empty(), "{mode:?}");
    }
}

#[test]
fn fully_solid_chunk_emits_no_block_faces_without_context() {
    // Every in-grid neighbor is solid and out-of-grid neighbors default to
    // solid, so nothing is exposed.
    let buf = solid_buf(ChunkCoord::new(0, 0, 0), 1);
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::Blocks);
    assert!(mesh.is_empty());
}

#[test]
fn single_solid_voxel_emits_exactly_six_quads() {
    let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
    buf.set_local(
        4,
        4,
        4,
        Voxel {
            density: 100,
            material: 3,
        },
    );
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::Blocks);
    assert_eq!(mesh.parts.len(), 1);
    let part = &mesh.parts[&3];
    assert_eq!(part.triangle_count(), 12);
    assert_eq!(part.vertex_count(), 24);
}

#[test]
fn marching_cubes_vertices_stay_inside_the_chunk() {
    let buf = sphere_buf(ChunkCoord::new(0, 0, 0), Vec3::splat(4.0), 3.0);
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::MarchingCubes);
    assert!(!mesh.is_empty());
    for p in positions(&mesh) {
        assert!(p.x >= -1e-4 && p.x <= CELLS as f32 + 1e-4);
        assert!(p.y >= -1e-4 && p.y <= CELLS as f32 + 1e-4);
        assert!(p.z >= -1e-4 && p.z <= CELLS as f32 + 1e-4);
    }
}

#[test]
fn marching_cubes_vertices_lie_on_cell_edges() {
    // An interpolated vertex sits on a lattice edge of the cell that emitted
    // it: two coordinates on the node grid, the third between its two nodes.
    let buf = sphere_buf(ChunkCoord::new(0, 0, 0), Vec3::splat(4.0), 3.0);
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::MarchingCubes);
    assert!(!mesh.is_empty());
    for p in positions(&mesh) {
        let on_grid = [p.x, p.y, p.z]
            .into_iter()
            .filter(|c| (c - c.round()).abs() < 1e-4)
            .count();
        assert!(on_grid >= 2, "vertex off every cell edge: {p:?}");
    }
}

#[test]
fn marching_cubes_single_node_stays_within_its_cells() {
    // One solid node at (4,4,4): every crossing edge is incident to it, so
    // every vertex pins two axes to 4 and keeps the third within one voxel.
    let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
    buf.set_local(
        4,
        4,
        4,
        Voxel {
            density: 100,
            material: 1,
        },
    );
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::MarchingCubes);
    assert!(!mesh.is_empty());
    for p in positions(&mesh) {
        let coords = [p.x, p.y, p.z];
        let pinned = coords.iter().filter(|&&c| (c - 4.0).abs() < 1e-4).count();
        assert!(pinned >= 2, "vertex strayed off the node's edges: {p:?}");
        for c in coords {
            assert!((3.0..=5.0).contains(&c), "vertex left its cells: {p:?}");
        }
    }
}

#[test]
fn marching_cubes_is_translation_invariant() {
    let here = sphere_buf(ChunkCoord::new(0, 0, 0), Vec3::splat(4.0), 3.0);
    let there = sphere_buf(ChunkCoord::new(3, 1, -2), Vec3::splat(4.0), 3.0);
    let mesh_here = extract_chunk_mesh(&here, VOXEL, None, MeshMode::MarchingCubes);
    let mesh_there = extract_chunk_mesh(&there, VOXEL, None, MeshMode::MarchingCubes);

    let offset = Vec3::new(3.0, 1.0, -2.0) * (CELLS as f32 * VOXEL);
    let a: Vec<Vec3> = positions(&mesh_here).collect();
    let b: Vec<Vec3> = positions(&mesh_there).collect();
    assert_eq!(a.len(), b.len());
    for (pa, pb) in a.iter().zip(&b) {
        assert!((*pa + offset - *pb).length() < 1e-3);
    }
}

#[test]
fn smoothed_and_hybrid_vertices_land_on_their_lattices() {
    let buf = sphere_buf(ChunkCoord::new(0, 0, 0), Vec3::splat(4.0), 3.0);
    for (mode, step) in [
        (MeshMode::SmoothedBlocks, VOXEL * 0.5),
        (MeshMode::HybridBlocks, VOXEL),
    ] {
        let mesh = extract_chunk_mesh(&buf, VOXEL, None, mode);
        assert!(!mesh.is_empty(), "{mode:?}");
        for p in positions(&mesh) {
            for c in [p.x, p.y, p.z] {
                assert!((c / step - (c / step).round()).abs() < 1e-4, "{mode:?}");
            }
        }
    }
}

#[test]
fn micro_blocks_on_a_solid_chunk_shell_only() {
    // Uniform solid density interpolates solid everywhere; with micro cells
    // beyond the chunk counting as air, only the outer shell is exposed.
    let div = 2usize;
    let buf = solid_buf(ChunkCoord::new(0, 0, 0), 1);
    let mesh = extract_chunk_mesh(
        &buf,
        VOXEL,
        None,
        MeshMode::MicroBlocks {
            subdivisions: div as u32,
        },
    );
    let micro_n = CELLS * div;
    let expected_quads = 6 * micro_n * micro_n;
    assert_eq!(mesh.triangle_count(), expected_quads * 2);
}

#[test]
fn micro_blocks_smooth_across_coarse_cell_boundaries() {
    // A half-filled grid: solid below the mid plane. The micro surface is a
    // single flat sheet, so every top face sits at the same height.
    let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
    let n = buf.nodes_per_axis();
    for z in 0..n {
        for y in 0..n / 2 {
            for x in 0..n {
                buf.set_local(
                    x,
                    y,
                    z,
                    Voxel {
                        density: 1000,
                        material: 1,
                    },
                );
            }
        }
    }
    let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::MicroBlocks { subdivisions: 4 });
    assert!(!mesh.is_empty());
    let top = positions(&mesh).map(|p| p.y).fold(f32::MIN, f32::max);
    // All upward faces share one height: no vertex pokes above the sheet.
    let near_top = positions(&mesh).filter(|p| (p.y - top).abs() < 1e-4).count();
    assert!(near_top >= 4);
}

#[test]
fn shoreline_blocks_turn_to_sand_near_sea_level() {
    use terravox_world::{TerrainContext, TerrainSettings};

    let ctx = TerrainContext::new(TerrainSettings::default(), Vec::new()).unwrap();
    let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
    // Grass just above the waterline and grass well above it.
    buf.set_local(2, 1, 2, Voxel { density: 100, material: material::MATERIAL_GRASS });
    buf.set_local(2, 6, 2, Voxel { density: 100, material: material::MATERIAL_GRASS });
    let mesh = extract_chunk_mesh(&buf, VOXEL, Some(&ctx), MeshMode::Blocks);
    assert!(mesh.parts.contains_key(&material::MATERIAL_SAND));
    assert!(mesh.parts.contains_key(&material::MATERIAL_GRASS));
}

#[test]
fn rock_is_never_replaced_by_sand() {
    use terravox_world::{TerrainContext, TerrainSettings};

    let ctx = TerrainContext::new(TerrainSettings::default(), Vec::new()).unwrap();
    let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
    buf.set_local(2, 1, 2, Voxel { density: 100, material: material::MATERIAL_ROCK });
    let mesh = extract_chunk_mesh(&buf, VOXEL, Some(&ctx), MeshMode::Blocks);
    assert!(mesh.parts.contains_key(&material::MATERIAL_ROCK));
    assert!(!mesh.parts.contains_key(&material::MATERIAL_SAND));
}

fn positions(mesh: &ChunkMeshCPU) -> impl Iterator<Item = Vec3> + '_ {
    mesh.parts.values().flat_map(|m| {
        m.pos
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn any_interior_voxel_alone_emits_six_quads(
        x in 1usize..CELLS - 1,
        y in 1usize..CELLS - 1,
        z in 1usize..CELLS - 1,
        density in 1i16..i16::MAX,
    ) {
        let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
        buf.set_local(x, y, z, Voxel { density, material: 2 });
        let mesh = extract_chunk_mesh(&buf, VOXEL, None, MeshMode::Blocks);
        prop_assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn extraction_never_panics_on_random_grids(seed in 0u64..1000) {
        let mut buf = air_buf(ChunkCoord::new(0, 0, 0));
        let n = buf.nodes_per_axis();
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let density = (state >> 48) as i16;
                    let material = if density > 0 { 1 + (state >> 32) as u16 % 4 } else { 0 };
                    buf.set_local(x, y, z, Voxel { density, material });
                }
            }
        }
        for mode in all_modes() {
            let _ = extract_chunk_mesh(&buf, VOXEL, None, mode);
        }
    }
}
