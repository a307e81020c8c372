use terravox_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

pub const ALL_FACES: [Face; 6] = [
    Face::PosX,
    Face::NegX,
    Face::PosY,
    Face::NegY,
    Face::PosZ,
    Face::NegZ,
];

impl Face {
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::PosX => Vec3::new(1.0, 0.0, 0.0),
            Face::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Face::PosY => Vec3::new(0.0, 1.0, 0.0),
            Face::NegY => Vec3::new(0.0, -1.0, 0.0),
            Face::PosZ => Vec3::new(0.0, 0.0, 1.0),
            Face::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// Integer grid step out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Counter-clockwise quad corners (seen from outside) for a cube with
    /// minimum corner `base` and edge length `s`.
    pub fn quad_corners(self, base: Vec3, s: f32) -> [Vec3; 4] {
        let v = |x: f32, y: f32, z: f32| base + Vec3::new(x, y, z);
        match self {
            Face::PosX => [v(s, 0.0, 0.0), v(s, s, 0.0), v(s, s, s), v(s, 0.0, s)],
            Face::NegX => [v(0.0, 0.0, s), v(0.0, s, s), v(0.0, s, 0.0), v(0.0, 0.0, 0.0)],
            Face::PosY => [v(0.0, s, 0.0), v(0.0, s, s), v(s, s, s), v(s, s, 0.0)],
            Face::NegY => [v(0.0, 0.0, s), v(0.0, 0.0, 0.0), v(s, 0.0, 0.0), v(s, 0.0, s)],
            Face::PosZ => [v(s, 0.0, s), v(s, s, s), v(0.0, s, s), v(0.0, 0.0, s)],
            Face::NegZ => [v(0.0, 0.0, 0.0), v(0.0, s, 0.0), v(s, s, 0.0), v(s, 0.0, 0.0)],
        }
    }
}
