//! Vertex quantization for the smoothed/hybrid block looks.
//!
//! Both styles run marching cubes first and then snap every vertex onto a
//! world-aligned lattice: half a voxel for the smoothed look, a full voxel
//! for the hybrid look. Snapping can collapse a triangle to zero area, so
//! triangles are re-emitted one at a time with freshly computed flat
//! normals and degenerate ones dropped.

use terravox_geom::Vec3;

use crate::mesh_build::MeshBuild;

#[inline]
fn snap(p: Vec3, step: f32) -> Vec3 {
    Vec3::new(
        (p.x / step).round() * step,
        (p.y / step).round() * step,
        (p.z / step).round() * step,
    )
}

/// Re-emits `src` with every vertex snapped to multiples of `step`.
pub fn quantize_triangles(src: &MeshBuild, step: f32, out: &mut MeshBuild) {
    for tri in src.idx.chunks_exact(3) {
        let fetch = |i: u32| {
            let i = i as usize * 3;
            Vec3::new(src.pos[i], src.pos[i + 1], src.pos[i + 2])
        };
        let a = snap(fetch(tri[0]), step);
        let b = snap(fetch(tri[1]), step);
        let c = snap(fetch(tri[2]), step);
        let n = (b - a).cross(c - a);
        let len = n.length();
        if len > 1e-12 {
            out.add_triangle(a, b, c, n / len);
        }
    }
}
