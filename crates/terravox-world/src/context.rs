use serde::Deserialize;
use terravox_geom::Aabb;

use crate::bounds;
use crate::error::WorldError;
use crate::feature::{Feature, FeatureKind};
use crate::noise::NoiseField;

/// Global scalars shared by every feature and chunk.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainSettings {
    /// Edge length of one voxel cell in world units.
    #[serde(default = "default_voxel_size")]
    pub voxel_size: f32,
    /// Cells per chunk edge; the sampled node grid is `(chunk_cells + 1)^3`.
    #[serde(default = "default_chunk_cells")]
    pub chunk_cells: usize,
    /// Terrain below this height is always air (water is not solid).
    #[serde(default)]
    pub sea_level: f32,
    /// World seed driving every noise sample.
    #[serde(default)]
    pub seed: i32,
}

fn default_voxel_size() -> f32 {
    1.0
}

fn default_chunk_cells() -> usize {
    16
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            voxel_size: default_voxel_size(),
            chunk_cells: default_chunk_cells(),
            sea_level: 0.0,
            seed: 0,
        }
    }
}

impl TerrainSettings {
    /// World-space edge length of one chunk.
    #[inline]
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_cells as f32 * self.voxel_size
    }

    fn validate(&self) -> Result<(), WorldError> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(WorldError::InvalidVoxelSize(self.voxel_size));
        }
        if self.chunk_cells == 0 {
            return Err(WorldError::InvalidChunkCells);
        }
        if !self.sea_level.is_finite() {
            return Err(WorldError::NonFiniteScalar { name: "sea_level" });
        }
        Ok(())
    }
}

/// Immutable snapshot of everything chunk generation reads: settings, the
/// ordered feature list, per-feature bounds, and the seeded noise sampler.
///
/// Workers share a snapshot behind an `Arc`; replacing the world means
/// building a new snapshot and swapping the pointer, never mutating one that
/// in-flight jobs may still be reading.
pub struct TerrainContext {
    pub settings: TerrainSettings,
    features: Vec<Feature>,
    bounds: Vec<Aabb>,
    noise: NoiseField,
}

impl TerrainContext {
    /// Validates the configuration and precomputes per-feature bounds.
    pub fn new(settings: TerrainSettings, features: Vec<Feature>) -> Result<Self, WorldError> {
        settings.validate()?;
        for (index, feature) in features.iter().enumerate() {
            validate_feature(index, feature)?;
        }
        let bounds = features
            .iter()
            .map(|f| bounds::feature_bounds(f, &settings))
            .collect();
        let noise = NoiseField::new(settings.seed);
        log::debug!(
            "terrain context ready: {} features, seed {}",
            features.len(),
            settings.seed
        );
        Ok(Self {
            settings,
            features,
            bounds,
            noise,
        })
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Conservative world-space box per feature, index-aligned with `features()`.
    #[inline]
    pub fn feature_bounds(&self) -> &[Aabb] {
        &self.bounds
    }

    #[inline]
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Indices of features whose bounds touch the given box; the per-chunk
    /// culling step before dense sampling.
    pub fn features_for_aabb(&self, query: Aabb) -> Vec<usize> {
        self.bounds
            .iter()
            .enumerate()
            .filter(|(_, bb)| bb.intersects(query))
            .map(|(i, _)| i)
            .collect()
    }
}

fn validate_feature(index: usize, feature: &Feature) -> Result<(), WorldError> {
    let invalid = |reason| WorldError::InvalidFeature { index, reason };
    let positive = |v: f32, reason: &'static str| {
        if v.is_finite() && v > 0.0 {
            Ok(())
        } else {
            Err(invalid(reason))
        }
    };
    // Materials are biome + 1, so the top biome id has no material slot.
    if feature.biome_id == u16::MAX {
        return Err(invalid("biome id 65535 is reserved"));
    }
    match feature.kind {
        FeatureKind::BaseIsland => positive(feature.data0.x, "island radius must be positive"),
        FeatureKind::Mountain => {
            positive(feature.data0.x, "mountain radius must be positive")?;
            positive(feature.data0.y, "mountain height must be positive")
        }
        FeatureKind::Lake => positive(feature.data0.x, "lake radius must be positive"),
        FeatureKind::CityPlateau => positive(feature.data0.x, "plateau radius must be positive"),
        FeatureKind::CaveRoom => positive(feature.data1.x, "cave room radius must be positive"),
        FeatureKind::CaveTunnel => positive(feature.data2.x, "cave tunnel radius must be positive"),
        FeatureKind::River => {
            positive(feature.data0.x, "river length must be positive")?;
            positive(feature.data0.y, "river width must be positive")?;
            positive(feature.data0.z, "river depth must be positive")
        }
        FeatureKind::Volcano => {
            positive(feature.data0.x, "volcano radius must be positive")?;
            positive(feature.data0.y, "volcano height must be positive")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;
    use terravox_geom::{Vec2, Vec3};

    #[test]
    fn rejects_zero_voxel_size() {
        let settings = TerrainSettings {
            voxel_size: 0.0,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            TerrainContext::new(settings, Vec::new()),
            Err(WorldError::InvalidVoxelSize(_))
        ));
    }

    #[test]
    fn rejects_zero_chunk_cells() {
        let settings = TerrainSettings {
            chunk_cells: 0,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            TerrainContext::new(settings, Vec::new()),
            Err(WorldError::InvalidChunkCells)
        ));
    }

    #[test]
    fn rejects_zero_radius_feature() {
        let err = TerrainContext::new(
            TerrainSettings::default(),
            vec![Feature::base_island(Vec2::ZERO, 0.0, 40.0, 0)],
        );
        assert!(matches!(
            err,
            Err(WorldError::InvalidFeature { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_reserved_biome_id() {
        let err = TerrainContext::new(
            TerrainSettings::default(),
            vec![Feature::base_island(Vec2::ZERO, 100.0, 30.0, u16::MAX)],
        );
        assert!(matches!(
            err,
            Err(WorldError::InvalidFeature { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_zero_depth_river() {
        let err = TerrainContext::new(
            TerrainSettings::default(),
            vec![Feature::river(
                Vec2::ZERO,
                200.0,
                10.0,
                0.0,
                0.01,
                20.0,
                8.0,
                1.0,
                0.3,
                5.0,
                3,
            )],
        );
        assert!(matches!(err, Err(WorldError::InvalidFeature { .. })));
    }

    #[test]
    fn culling_returns_only_touching_features() {
        let ctx = TerrainContext::new(
            TerrainSettings::default(),
            vec![
                Feature::base_island(Vec2::ZERO, 100.0, 30.0, 0),
                Feature::cave_room(Vec3::new(5000.0, 10.0, 0.0), 10.0, 0.0, 0.0, 1.0, 2),
            ],
        )
        .unwrap();
        let near = ctx.features_for_aabb(Aabb::new(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 10.0, 10.0),
        ));
        assert_eq!(near, vec![0]);
    }
}
