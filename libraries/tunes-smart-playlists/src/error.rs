//! Error types for smart playlist derivation

use thiserror::Error;
use tunes_core::{SmartPlaylistKind, TunesError};

/// Derivation errors
#[derive(Debug, Error)]
pub enum DerivationError {
    /// One job failed; the other jobs and the job's previous membership are unaffected
    #[error("{} job failed: {source}", .kind.name())]
    DerivationPartialFailure {
        kind: SmartPlaylistKind,
        #[source]
        source: TunesError,
    },

    /// Settings that cannot produce a playlist
    #[error("Invalid derivation settings: {0}")]
    InvalidSettings(String),
}

impl DerivationError {
    pub(crate) fn job(kind: SmartPlaylistKind, source: TunesError) -> Self {
        Self::DerivationPartialFailure { kind, source }
    }

    /// Kind of the failed job, if the error belongs to one
    pub fn kind(&self) -> Option<SmartPlaylistKind> {
        match self {
            Self::DerivationPartialFailure { kind, .. } => Some(*kind),
            Self::InvalidSettings(_) => None,
        }
    }
}

/// Result type for derivation
pub type Result<T> = std::result::Result<T, DerivationError>;
