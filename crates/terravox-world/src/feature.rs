use terravox_geom::{Vec2, Vec3};

/// How a feature's distance field folds into the accumulated terrain field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Adds solid: `acc = min(acc, s)`.
    Union,
    /// Carves solid: `acc = max(acc, -s)`.
    Subtract,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    BaseIsland,
    Mountain,
    Lake,
    CityPlateau,
    CaveRoom,
    CaveTunnel,
    River,
    Volcano,
}

/// One terrain feature in wire form: a kind tag plus four packed parameter
/// vectors. The packing per kind is defined by the `*Params` unpackers below
/// and the constructors on [`Feature`]; evaluators never read `data*` slots
/// directly.
#[derive(Clone, Copy, Debug)]
pub struct Feature {
    pub kind: FeatureKind,
    pub blend: BlendMode,
    /// Biome this feature claims where it dominates the field.
    pub biome_id: u16,
    /// Horizontal anchor (unused by cave features, which carry 3D anchors in data slots).
    pub center_xz: Vec2,
    pub data0: Vec3,
    pub data1: Vec3,
    pub data2: Vec3,
    pub data3: Vec3,
}

impl Feature {
    fn packed(kind: FeatureKind, blend: BlendMode, biome_id: u16, center_xz: Vec2) -> Self {
        Self {
            kind,
            blend,
            biome_id,
            center_xz,
            data0: Vec3::ZERO,
            data1: Vec3::ZERO,
            data2: Vec3::ZERO,
            data3: Vec3::ZERO,
        }
    }

    /// Noise-warped island base disc: dome of terrain rising from sea level.
    pub fn base_island(center_xz: Vec2, radius: f32, max_height: f32, biome_id: u16) -> Self {
        let mut f = Self::packed(FeatureKind::BaseIsland, BlendMode::Union, biome_id, center_xz);
        f.data0 = Vec3::new(radius, max_height, 0.0);
        f
    }

    pub fn mountain(
        center_xz: Vec2,
        radius: f32,
        height: f32,
        ridge_frequency: f32,
        ridge_amplitude: f32,
        warp_strength: f32,
        seed: f32,
        biome_id: u16,
    ) -> Self {
        let mut f = Self::packed(FeatureKind::Mountain, BlendMode::Union, biome_id, center_xz);
        f.data0 = Vec3::new(radius, height, ridge_frequency);
        f.data1 = Vec3::new(ridge_amplitude, warp_strength, seed);
        f
    }

    /// Basin carve: removes terrain above a bowl surface that lerps from
    /// `bottom_height` at the center to `shore_height` at the radius.
    pub fn lake(
        center_xz: Vec2,
        radius: f32,
        bottom_height: f32,
        shore_height: f32,
        biome_id: u16,
    ) -> Self {
        let mut f = Self::packed(FeatureKind::Lake, BlendMode::Subtract, biome_id, center_xz);
        f.data0 = Vec3::new(radius, bottom_height, shore_height);
        f
    }

    pub fn city_plateau(center_xz: Vec2, radius: f32, plateau_height: f32, biome_id: u16) -> Self {
        let mut f = Self::packed(
            FeatureKind::CityPlateau,
            BlendMode::Union,
            biome_id,
            center_xz,
        );
        f.data0 = Vec3::new(radius, plateau_height, 0.0);
        f
    }

    pub fn cave_room(
        center: Vec3,
        radius: f32,
        noise_frequency: f32,
        noise_amplitude: f32,
        seed: f32,
        biome_id: u16,
    ) -> Self {
        let mut f = Self::packed(
            FeatureKind::CaveRoom,
            BlendMode::Subtract,
            biome_id,
            center.xz(),
        );
        f.data0 = center;
        f.data1 = Vec3::new(radius, noise_frequency, noise_amplitude);
        f.data2 = Vec3::new(seed, 0.0, 0.0);
        f
    }

    pub fn cave_tunnel(
        start: Vec3,
        end: Vec3,
        radius: f32,
        noise_frequency: f32,
        noise_amplitude: f32,
        seed: f32,
        biome_id: u16,
    ) -> Self {
        let mid = (start + end) * 0.5;
        let mut f = Self::packed(
            FeatureKind::CaveTunnel,
            BlendMode::Subtract,
            biome_id,
            mid.xz(),
        );
        f.data0 = start;
        f.data1 = end;
        f.data2 = Vec3::new(radius, noise_frequency, noise_amplitude);
        f.data3 = Vec3::new(seed, 0.0, 0.0);
        f
    }

    #[allow(clippy::too_many_arguments)]
    pub fn river(
        center_xz: Vec2,
        length: f32,
        width: f32,
        depth: f32,
        meander_frequency: f32,
        meander_amplitude: f32,
        start_height: f32,
        end_height: f32,
        rotation_radians: f32,
        seed: f32,
        biome_id: u16,
    ) -> Self {
        let mut f = Self::packed(FeatureKind::River, BlendMode::Subtract, biome_id, center_xz);
        f.data0 = Vec3::new(length, width, depth);
        f.data1 = Vec3::new(meander_frequency, meander_amplitude, seed);
        f.data2 = Vec3::new(start_height, end_height, rotation_radians);
        // Rotation is fixed per feature, so the trig is hoisted out of the hot path.
        f.data3 = Vec3::new(rotation_radians.sin(), rotation_radians.cos(), 0.0);
        f
    }

    #[allow(clippy::too_many_arguments)]
    pub fn volcano(
        center_xz: Vec2,
        radius: f32,
        height: f32,
        base_height: f32,
        crater_radius: f32,
        crater_depth: f32,
        path_noise_frequency: f32,
        path_noise_amplitude: f32,
        path_depth: f32,
        seed: f32,
        biome_id: u16,
    ) -> Self {
        let mut f = Self::packed(FeatureKind::Volcano, BlendMode::Union, biome_id, center_xz);
        f.data0 = Vec3::new(radius, height, base_height);
        f.data1 = Vec3::new(crater_radius, crater_depth, path_noise_frequency);
        f.data2 = Vec3::new(path_noise_amplitude, path_depth, seed);
        f
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IslandParams {
    pub center: Vec2,
    pub radius: f32,
    pub max_height: f32,
}

impl IslandParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            radius: f.data0.x,
            max_height: f.data0.y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MountainParams {
    pub center: Vec2,
    pub radius: f32,
    pub height: f32,
    pub ridge_frequency: f32,
    pub ridge_amplitude: f32,
    pub warp_strength: f32,
    pub seed: f32,
}

impl MountainParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            radius: f.data0.x,
            height: f.data0.y,
            ridge_frequency: f.data0.z,
            ridge_amplitude: f.data1.x,
            warp_strength: f.data1.y,
            seed: f.data1.z,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LakeParams {
    pub center: Vec2,
    pub radius: f32,
    pub bottom_height: f32,
    pub shore_height: f32,
}

impl LakeParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            radius: f.data0.x,
            bottom_height: f.data0.y,
            shore_height: f.data0.z,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PlateauParams {
    pub center: Vec2,
    pub radius: f32,
    pub plateau_height: f32,
}

impl PlateauParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            radius: f.data0.x,
            plateau_height: f.data0.y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CaveRoomParams {
    pub center: Vec3,
    pub radius: f32,
    pub noise_frequency: f32,
    pub noise_amplitude: f32,
    pub seed: f32,
}

impl CaveRoomParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.data0,
            radius: f.data1.x,
            noise_frequency: f.data1.y,
            noise_amplitude: f.data1.z,
            seed: f.data2.x,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CaveTunnelParams {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
    pub noise_frequency: f32,
    pub noise_amplitude: f32,
    pub seed: f32,
}

impl CaveTunnelParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            start: f.data0,
            end: f.data1,
            radius: f.data2.x,
            noise_frequency: f.data2.y,
            noise_amplitude: f.data2.z,
            seed: f.data3.x,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RiverParams {
    pub center: Vec2,
    pub length: f32,
    pub width: f32,
    pub depth: f32,
    pub meander_frequency: f32,
    pub meander_amplitude: f32,
    pub start_height: f32,
    pub end_height: f32,
    pub seed: f32,
    pub sin_rotation: f32,
    pub cos_rotation: f32,
}

impl RiverParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            length: f.data0.x,
            width: f.data0.y,
            depth: f.data0.z,
            meander_frequency: f.data1.x,
            meander_amplitude: f.data1.y,
            seed: f.data1.z,
            start_height: f.data2.x,
            end_height: f.data2.y,
            sin_rotation: f.data3.x,
            cos_rotation: f.data3.y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VolcanoParams {
    pub center: Vec2,
    pub radius: f32,
    pub height: f32,
    pub base_height: f32,
    pub crater_radius: f32,
    pub crater_depth: f32,
    pub path_noise_frequency: f32,
    pub path_noise_amplitude: f32,
    pub path_depth: f32,
    pub seed: f32,
}

impl VolcanoParams {
    pub fn unpack(f: &Feature) -> Self {
        Self {
            center: f.center_xz,
            radius: f.data0.x,
            height: f.data0.y,
            base_height: f.data0.z,
            crater_radius: f.data1.x,
            crater_depth: f.data1.y,
            path_noise_frequency: f.data1.z,
            path_noise_amplitude: f.data2.x,
            path_depth: f.data2.y,
            seed: f.data2.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn river_roundtrip_and_precomputed_rotation() {
        let rot = 0.75f32;
        let f = Feature::river(
            Vec2::new(10.0, -20.0),
            400.0,
            12.0,
            6.0,
            0.01,
            30.0,
            8.0,
            1.0,
            rot,
            42.0,
            5,
        );
        let p = RiverParams::unpack(&f);
        assert_eq!(p.length, 400.0);
        assert_eq!(p.width, 12.0);
        assert_eq!(p.depth, 6.0);
        assert_eq!(p.start_height, 8.0);
        assert_eq!(p.end_height, 1.0);
        assert!((p.sin_rotation - rot.sin()).abs() < 1e-6);
        assert!((p.cos_rotation - rot.cos()).abs() < 1e-6);
        assert_eq!(f.blend, BlendMode::Subtract);
    }

    #[test]
    fn tunnel_anchor_is_segment_midpoint() {
        let f = Feature::cave_tunnel(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(100.0, 20.0, 40.0),
            4.0,
            0.1,
            0.5,
            9.0,
            2,
        );
        assert_eq!(f.center_xz, Vec2::new(50.0, 20.0));
        let p = CaveTunnelParams::unpack(&f);
        assert_eq!(p.radius, 4.0);
        assert_eq!(p.seed, 9.0);
    }
}
