//! Playback Events
//!
//! Event-based communication for UI synchronization. The manager queues
//! events as state changes and the host drains them after each call.

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};
use tunes_core::TrackId;

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed (loading, playing, paused, idle)
    StateChanged { state: PlaybackState },

    /// A different track became current
    TrackChanged {
        track_id: TrackId,
        previous_track_id: Option<TrackId>,
    },

    /// Position or duration changed (progress, seek, load)
    PositionChanged { current_time: f64, duration: f64 },

    /// Volume or mute changed
    VolumeChanged { volume: f32, is_muted: bool },

    /// Queue contents, position, shuffle or repeat changed
    QueueChanged {
        length: usize,
        current_index: Option<usize>,
        shuffle: bool,
        repeat: RepeatMode,
    },

    /// The idle-expiry timer tore the session down
    SessionExpired,

    /// An error was surfaced to the listener
    Error { message: String },
}
