//! Marching cubes over the padded node grid.

use terravox_chunk::ChunkBuf;
use terravox_geom::Vec3;

use crate::mesh_build::MeshBuild;
use crate::tables::{EDGE_TABLE, TRI_TABLE};

/// Cell-corner node offsets: 0..3 ring the bottom face (+x then +z), 4..7
/// the top face in the same order.
const CORNER_OFFSETS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 0, 1),
    (0, 0, 1),
    (0, 1, 0),
    (1, 1, 0),
    (1, 1, 1),
    (0, 1, 1),
];

/// Edge endpoints as corner-index pairs, matching the case tables.
const EDGE_CORNERS: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Runs marching cubes over every cell of `buf`, emitting flat-shaded
/// triangles in world space. Corner solidity is `density > 0`; the surface
/// vertex on a crossing edge sits at the linear zero of the two corner
/// densities.
pub fn march_chunk(buf: &ChunkBuf, voxel_size: f32, out: &mut MeshBuild) {
    let cells = buf.cells;
    let origin = crate::chunk_origin(buf, voxel_size);

    let mut densities = [0.0f32; 8];
    let mut corners = [Vec3::ZERO; 8];
    let mut edge_verts = [Vec3::ZERO; 12];

    for z in 0..cells {
        for y in 0..cells {
            for x in 0..cells {
                let mut case = 0usize;
                for (i, (dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
                    let v = buf.get_local(x + dx, y + dy, z + dz);
                    densities[i] = v.density as f32;
                    corners[i] = origin
                        + Vec3::new(
                            (x + dx) as f32,
                            (y + dy) as f32,
                            (z + dz) as f32,
                        ) * voxel_size;
                    if v.is_solid() {
                        case |= 1 << i;
                    }
                }

                let edges = EDGE_TABLE[case];
                if edges == 0 {
                    continue;
                }

                for (e, &(a, b)) in EDGE_CORNERS.iter().enumerate() {
                    if edges & (1 << e) == 0 {
                        continue;
                    }
                    let da = densities[a];
                    let db = densities[b];
                    // Signs differ on a crossing edge, so the denominator
                    // cannot vanish.
                    let t = da / (da - db);
                    edge_verts[e] = corners[a] + (corners[b] - corners[a]) * t;
                }

                let row = &TRI_TABLE[case];
                let mut i = 0;
                while row[i] >= 0 {
                    let a = edge_verts[row[i] as usize];
                    let b = edge_verts[row[i + 1] as usize];
                    let c = edge_verts[row[i + 2] as usize];
                    let n = (b - a).cross(c - a);
                    let len = n.length();
                    if len > 1e-12 {
                        out.add_triangle(a, b, c, n / len);
                    }
                    i += 3;
                }
            }
        }
    }
}
