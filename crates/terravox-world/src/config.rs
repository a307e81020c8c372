//! TOML world files: global settings plus an ordered `[[feature]]` list.

use std::path::Path;

use serde::Deserialize;
use terravox_geom::{Vec2, Vec3};

use crate::context::{TerrainContext, TerrainSettings};
use crate::error::WorldError;
use crate::feature::Feature;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WorldFile {
    #[serde(default)]
    settings: TerrainSettings,
    #[serde(default, rename = "feature")]
    features: Vec<FeatureConfig>,
}

fn default_ridge_frequency() -> f32 {
    0.05
}

fn default_ridge_amplitude() -> f32 {
    8.0
}

fn default_warp_strength() -> f32 {
    4.0
}

fn default_noise_frequency() -> f32 {
    0.08
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
enum FeatureConfig {
    BaseIsland {
        #[serde(default)]
        center: [f32; 2],
        radius: f32,
        max_height: f32,
        #[serde(default)]
        biome: u16,
    },
    Mountain {
        center: [f32; 2],
        radius: f32,
        height: f32,
        #[serde(default = "default_ridge_frequency")]
        ridge_frequency: f32,
        #[serde(default = "default_ridge_amplitude")]
        ridge_amplitude: f32,
        #[serde(default = "default_warp_strength")]
        warp_strength: f32,
        #[serde(default)]
        seed: f32,
        #[serde(default)]
        biome: u16,
    },
    Lake {
        center: [f32; 2],
        radius: f32,
        bottom_height: f32,
        shore_height: f32,
        #[serde(default)]
        biome: u16,
    },
    CityPlateau {
        center: [f32; 2],
        radius: f32,
        plateau_height: f32,
        #[serde(default)]
        biome: u16,
    },
    CaveRoom {
        center: [f32; 3],
        radius: f32,
        #[serde(default = "default_noise_frequency")]
        noise_frequency: f32,
        #[serde(default)]
        noise_amplitude: f32,
        #[serde(default)]
        seed: f32,
        #[serde(default)]
        biome: u16,
    },
    CaveTunnel {
        start: [f32; 3],
        end: [f32; 3],
        radius: f32,
        #[serde(default = "default_noise_frequency")]
        noise_frequency: f32,
        #[serde(default)]
        noise_amplitude: f32,
        #[serde(default)]
        seed: f32,
        #[serde(default)]
        biome: u16,
    },
    River {
        center: [f32; 2],
        length: f32,
        width: f32,
        depth: f32,
        #[serde(default = "default_noise_frequency")]
        meander_frequency: f32,
        #[serde(default)]
        meander_amplitude: f32,
        start_height: f32,
        end_height: f32,
        #[serde(default)]
        rotation: f32,
        #[serde(default)]
        seed: f32,
        #[serde(default)]
        biome: u16,
    },
    Volcano {
        center: [f32; 2],
        radius: f32,
        height: f32,
        #[serde(default)]
        base_height: f32,
        crater_radius: f32,
        crater_depth: f32,
        #[serde(default = "default_noise_frequency")]
        path_noise_frequency: f32,
        #[serde(default)]
        path_noise_amplitude: f32,
        #[serde(default)]
        path_depth: f32,
        #[serde(default)]
        seed: f32,
        #[serde(default)]
        biome: u16,
    },
}

impl FeatureConfig {
    fn into_feature(self) -> Feature {
        fn v2(a: [f32; 2]) -> Vec2 {
            Vec2::new(a[0], a[1])
        }
        fn v3(a: [f32; 3]) -> Vec3 {
            Vec3::new(a[0], a[1], a[2])
        }
        match self {
            FeatureConfig::BaseIsland {
                center,
                radius,
                max_height,
                biome,
            } => Feature::base_island(v2(center), radius, max_height, biome),
            FeatureConfig::Mountain {
                center,
                radius,
                height,
                ridge_frequency,
                ridge_amplitude,
                warp_strength,
                seed,
                biome,
            } => Feature::mountain(
                v2(center),
                radius,
                height,
                ridge_frequency,
                ridge_amplitude,
                warp_strength,
                seed,
                biome,
            ),
            FeatureConfig::Lake {
                center,
                radius,
                bottom_height,
                shore_height,
                biome,
            } => Feature::lake(v2(center), radius, bottom_height, shore_height, biome),
            FeatureConfig::CityPlateau {
                center,
                radius,
                plateau_height,
                biome,
            } => Feature::city_plateau(v2(center), radius, plateau_height, biome),
            FeatureConfig::CaveRoom {
                center,
                radius,
                noise_frequency,
                noise_amplitude,
                seed,
                biome,
            } => Feature::cave_room(v3(center), radius, noise_frequency, noise_amplitude, seed, biome),
            FeatureConfig::CaveTunnel {
                start,
                end,
                radius,
                noise_frequency,
                noise_amplitude,
                seed,
                biome,
            } => Feature::cave_tunnel(
                v3(start),
                v3(end),
                radius,
                noise_frequency,
                noise_amplitude,
                seed,
                biome,
            ),
            FeatureConfig::River {
                center,
                length,
                width,
                depth,
                meander_frequency,
                meander_amplitude,
                start_height,
                end_height,
                rotation,
                seed,
                biome,
            } => Feature::river(
                v2(center),
                length,
                width,
                depth,
                meander_frequency,
                meander_amplitude,
                start_height,
                end_height,
                rotation,
                seed,
                biome,
            ),
            FeatureConfig::Volcano {
                center,
                radius,
                height,
                base_height,
                crater_radius,
                crater_depth,
                path_noise_frequency,
                path_noise_amplitude,
                path_depth,
                seed,
                biome,
            } => Feature::volcano(
                v2(center),
                radius,
                height,
                base_height,
                crater_radius,
                crater_depth,
                path_noise_frequency,
                path_noise_amplitude,
                path_depth,
                seed,
                biome,
            ),
        }
    }
}

/// Parses a world description and validates it into a ready context.
pub fn parse_world_str(text: &str) -> Result<TerrainContext, WorldError> {
    let file: WorldFile = toml::from_str(text)?;
    let features = file.features.into_iter().map(FeatureConfig::into_feature);
    TerrainContext::new(file.settings, features.collect())
}

/// Reads and parses a world file from disk.
pub fn load_world_file(path: &Path) -> Result<TerrainContext, WorldError> {
    let text = std::fs::read_to_string(path)?;
    parse_world_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{BlendMode, FeatureKind};

    #[test]
    fn parses_settings_and_features() {
        let ctx = parse_world_str(
            r#"
            [settings]
            voxel_size = 0.5
            chunk_cells = 32
            sea_level = 1.0
            seed = 42

            [[feature]]
            kind = "base_island"
            radius = 400.0
            max_height = 60.0

            [[feature]]
            kind = "mountain"
            center = [120.0, -40.0]
            radius = 150.0
            height = 120.0
            biome = 1

            [[feature]]
            kind = "cave_tunnel"
            start = [0.0, 10.0, 0.0]
            end = [80.0, 25.0, 30.0]
            radius = 4.0
            biome = 2
            "#,
        )
        .unwrap();

        assert_eq!(ctx.settings.chunk_cells, 32);
        assert_eq!(ctx.settings.seed, 42);
        assert_eq!(ctx.features().len(), 3);
        assert_eq!(ctx.features()[0].kind, FeatureKind::BaseIsland);
        assert_eq!(ctx.features()[1].biome_id, 1);
        assert_eq!(ctx.features()[2].blend, BlendMode::Subtract);
    }

    #[test]
    fn defaults_apply_when_settings_missing() {
        let ctx = parse_world_str(
            r#"
            [[feature]]
            kind = "base_island"
            radius = 100.0
            max_height = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(ctx.settings.chunk_cells, 16);
        assert_eq!(ctx.settings.voxel_size, 1.0);
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = parse_world_str(
            r#"
            [[feature]]
            kind = "forest"
            radius = 10.0
            "#,
        );
        assert!(matches!(err, Err(WorldError::Parse(_))));
    }

    #[test]
    fn invalid_radius_is_rejected_after_parse() {
        let err = parse_world_str(
            r#"
            [[feature]]
            kind = "base_island"
            radius = 0.0
            max_height = 20.0
            "#,
        );
        assert!(matches!(err, Err(WorldError::InvalidFeature { .. })));
    }
}
