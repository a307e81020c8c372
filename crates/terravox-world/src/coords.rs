use terravox_geom::{Aabb, Vec3};

use crate::context::TerrainSettings;

/// Integer chunk coordinate; chunk (0,0,0) has its minimum corner at the
/// world origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World-space position of the chunk's minimum corner.
    pub fn origin(self, settings: &TerrainSettings) -> Vec3 {
        let size = settings.chunk_world_size();
        Vec3::new(
            self.x as f32 * size,
            self.y as f32 * size,
            self.z as f32 * size,
        )
    }

    /// World-space box covered by this chunk.
    pub fn aabb(self, settings: &TerrainSettings) -> Aabb {
        let min = self.origin(settings);
        Aabb::new(min, min + Vec3::splat(settings.chunk_world_size()))
    }

    /// Chunk containing a world-space point.
    pub fn from_world(p: Vec3, settings: &TerrainSettings) -> Self {
        let size = settings.chunk_world_size();
        Self {
            x: (p.x / size).floor() as i32,
            y: (p.y / size).floor() as i32,
            z: (p.z / size).floor() as i32,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TerrainSettings {
        TerrainSettings {
            voxel_size: 2.0,
            chunk_cells: 16,
            sea_level: 0.0,
            seed: 0,
        }
    }

    #[test]
    fn origin_roundtrip() {
        let s = settings();
        let c = ChunkCoord::new(-2, 1, 3);
        let inside = c.origin(&s) + Vec3::splat(0.5);
        assert_eq!(ChunkCoord::from_world(inside, &s), c);
    }

    #[test]
    fn negative_coordinates_floor_correctly() {
        let s = settings();
        // Chunk world size is 32; -0.5 lies in chunk -1.
        let c = ChunkCoord::from_world(Vec3::new(-0.5, -0.5, -0.5), &s);
        assert_eq!(c, ChunkCoord::new(-1, -1, -1));
    }

    #[test]
    fn aabb_spans_one_chunk() {
        let s = settings();
        let bb = ChunkCoord::new(1, 0, 0).aabb(&s);
        assert_eq!(bb.min, Vec3::new(32.0, 0.0, 0.0));
        assert_eq!(bb.max, Vec3::new(64.0, 32.0, 32.0));
    }
}
