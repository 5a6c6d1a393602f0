/// Jobs error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobsError>;

#[derive(Debug, Error)]
pub enum JobsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tunes_storage::StorageError),

    #[error("Derivation error: {0}")]
    Derivation(#[from] tunes_smart_playlists::DerivationError),
}

impl From<config::ConfigError> for JobsError {
    fn from(err: config::ConfigError) -> Self {
        JobsError::Config(err.to_string())
    }
}
