//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Resource requested, waiting for it to report `loaded`
    Loading,

    /// Track loaded (or restored) but not playing
    Paused,

    /// Currently playing
    Playing,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the `off -> all -> one -> off` cycle
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Configuration for the playback manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Paused sessions are torn down after this long (default: 5 minutes)
    pub idle_expiry: Duration,

    /// Snapshots older than this are discarded on startup (default: 5 minutes)
    pub snapshot_expiry: Duration,

    /// Initial volume (0.0-1.0, default: 0.8)
    pub initial_volume: f32,

    /// Maximum number of remembered queue positions (default: 1000)
    pub history_size: usize,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            idle_expiry: Duration::from_secs(5 * 60),
            snapshot_expiry: Duration::from_secs(5 * 60),
            initial_volume: 0.8,
            history_size: 1000,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}
