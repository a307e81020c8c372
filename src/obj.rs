//! Wavefront OBJ export for inspecting chunk meshes offline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use terravox_mesh_cpu::ChunkMeshCPU;

/// Writes one chunk mesh as `chunk_<x>_<y>_<z>.obj`, grouping triangles by
/// material id. Positions are already world-space, so the files from several
/// chunks load as one scene.
pub fn write_chunk_obj(dir: &Path, mesh: &ChunkMeshCPU) -> std::io::Result<()> {
    let c = mesh.coord;
    let path = dir.join(format!("chunk_{}_{}_{}.obj", c.x, c.y, c.z));
    let mut w = BufWriter::new(File::create(path)?);

    writeln!(w, "o chunk_{}_{}_{}", c.x, c.y, c.z)?;
    let mut base = 1usize;
    let mut materials: Vec<_> = mesh.parts.iter().collect();
    materials.sort_by_key(|(mat, _)| **mat);
    for (mat, part) in materials {
        writeln!(w, "g material_{mat}")?;
        for p in part.pos.chunks_exact(3) {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
        for n in part.norm.chunks_exact(3) {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        for t in part.idx.chunks_exact(3) {
            let (a, b, c) = (
                base + t[0] as usize,
                base + t[1] as usize,
                base + t[2] as usize,
            );
            writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        base += part.vertex_count();
    }
    w.flush()
}
