//! Terrain field core: feature model, SDF composition, bounds, biomes, config.
#![forbid(unsafe_code)]

pub mod bounds;
pub mod config;
mod context;
mod coords;
mod error;
mod feature;
pub mod material;
mod noise;
pub mod sdf;

pub use bounds::{
    WorldExtents, feature_bounds, plan_world_extents, plan_world_extents_probed,
    probe_surface_ceiling,
};
pub use config::{load_world_file, parse_world_str};
pub use context::{TerrainContext, TerrainSettings};
pub use coords::ChunkCoord;
pub use error::WorldError;
pub use material::{BiomeId, MaterialId};
pub use feature::{
    BlendMode, CaveRoomParams, CaveTunnelParams, Feature, FeatureKind, IslandParams, LakeParams,
    MountainParams, PlateauParams, RiverParams, VolcanoParams,
};
pub use noise::NoiseField;
pub use sdf::UNBOUNDED_SDF;
