//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The resource for a track could not be created or failed while loading.
    /// Fatal for that track; the session returns to idle.
    #[error("Failed to load {locator}: {reason}")]
    ResourceLoadFailure { locator: String, reason: String },

    /// The resource refused to start (e.g. a user-gesture policy).
    /// Recoverable through an explicit `resume()`.
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Writing the session snapshot failed
    #[error("Failed to persist playback snapshot: {0}")]
    PersistenceWriteFailure(String),

    /// A stored snapshot could not be read back
    #[error("Stored playback snapshot is unreadable: {0}")]
    PersistenceReadCorrupt(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    /// Create a load failure for a locator
    pub fn load_failure(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoadFailure {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Whether the listener can recover by retrying explicitly
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PlaybackRejected(_))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
