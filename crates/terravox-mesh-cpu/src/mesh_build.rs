use terravox_geom::Vec3;

use crate::face::Face;

/// Flat vertex/normal/UV/index arrays for one submesh. Indices are 32-bit:
/// the micro-blocks path can exceed 65k vertices per chunk.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Pre-reserve room for approximately `n_quads` quads.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f32, f32)) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z]);
        self.uv.extend_from_slice(&[uv.0, uv.1]);
    }

    /// Appends one triangle with a shared (flat) normal.
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, n: Vec3) {
        let base = self.vertex_count() as u32;
        self.push_vertex(a, n, (0.0, 0.0));
        self.push_vertex(b, n, (1.0, 0.0));
        self.push_vertex(c, n, (0.0, 1.0));
        self.idx.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a quad (two triangles); corners must wind counter-clockwise
    /// as seen along the normal.
    pub fn add_quad(&mut self, corners: [Vec3; 4], n: Vec3) {
        let base = self.vertex_count() as u32;
        let uvs = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        for (p, uv) in corners.into_iter().zip(uvs) {
            self.push_vertex(p, n, uv);
        }
        self.idx.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }

    /// Appends an axis-aligned cube face at `base` with edge length `s`.
    #[inline]
    pub fn add_cube_face(&mut self, face: Face, base: Vec3, s: f32) {
        self.add_quad(face.quad_corners(base, s), face.normal());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_emits_four_vertices_two_triangles() {
        let mut m = MeshBuild::default();
        m.add_cube_face(Face::PosY, Vec3::ZERO, 1.0);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangle_count(), 2);
        // Every normal points up.
        for n in m.norm.chunks_exact(3) {
            assert_eq!(n, &[0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn triangle_indices_are_sequential() {
        let mut m = MeshBuild::default();
        m.add_triangle(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        m.add_triangle(
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert_eq!(m.idx, vec![0, 1, 2, 3, 4, 5]);
    }
}
