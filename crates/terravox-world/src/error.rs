use thiserror::Error;

/// Errors surfaced while loading or validating terrain configuration.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse world file: {0}")]
    Parse(#[from] Box<toml::de::Error>),
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f32),
    #[error("chunk cell count must be at least 1")]
    InvalidChunkCells,
    #[error("{name} must be finite")]
    NonFiniteScalar { name: &'static str },
    #[error("feature #{index} is invalid: {reason}")]
    InvalidFeature { index: usize, reason: &'static str },
}

impl From<toml::de::Error> for WorldError {
    fn from(err: toml::de::Error) -> Self {
        WorldError::Parse(Box::new(err))
    }
}
