//! Tunes - Playback Session
//!
//! Platform-agnostic playback session management for Tunes.
//!
//! This crate provides:
//! - A single playback session with at most one live audio resource
//! - Queue with sequential and shuffle order, repeat modes (Off, All, One)
//! - Index history for exact "previous" and shuffle passes
//! - Volume control (0.0-1.0, mute/unmute)
//! - Idle expiry of paused sessions
//! - Snapshot persistence so a reload can resume where the listener left off
//!
//! # Architecture
//!
//! `tunes-playback` knows nothing about the platform audio sink or the
//! storage medium used for snapshots:
//! - Audio resources are created through a [`ResourceAdapter`]; handles report
//!   back with [`ResourceEvent`]s tagged by [`Generation`]
//! - Snapshots go through a [`SnapshotStore`]
//! - Time comes from a [`Clock`]; timers fire when the host calls
//!   [`PlaybackManager::tick`]
//!
//! # Example: Restore and resume
//!
//! ```rust
//! use std::sync::Arc;
//! use tunes_playback::{
//!     Generation, MemorySnapshotStore, PlayStatus, PlaybackConfig, PlaybackManager,
//!     ResourceAdapter, ResourceHandle, Result, SystemClock,
//! };
//!
//! struct Silent;
//!
//! impl ResourceHandle for Silent {
//!     fn play(&mut self) -> Result<PlayStatus> {
//!         Ok(PlayStatus::Started)
//!     }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _time: f64) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn dispose(&mut self) {}
//! }
//!
//! struct SilentAdapter;
//!
//! impl ResourceAdapter for SilentAdapter {
//!     fn create(&mut self, _locator: &str, _generation: Generation) -> Result<Box<dyn ResourceHandle>> {
//!         Ok(Box::new(Silent))
//!     }
//! }
//!
//! let mut manager = PlaybackManager::new(
//!     PlaybackConfig::default(),
//!     Box::new(SilentAdapter),
//!     Box::new(MemorySnapshotStore::new()),
//!     Arc::new(SystemClock),
//! );
//!
//! // Nothing stored yet
//! assert!(!manager.restore());
//! assert!(manager.current_track().is_none());
//!
//! manager.set_volume(0.5);
//! assert_eq!(manager.session().volume.level(), 0.5);
//! ```

mod clock;
mod error;
mod events;
mod history;
mod manager;
mod persistence;
mod queue;
mod resource;
mod session;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use manager::PlaybackManager;
pub use persistence::{
    JsonFileSnapshotStore, MemorySnapshotStore, PersistenceGateway, QueueSnapshot, Snapshot,
    SnapshotStore,
};
pub use queue::Queue;
pub use resource::{
    Generation, PlayStatus, ResourceAdapter, ResourceEvent, ResourceEventKind, ResourceHandle,
};
pub use session::Session;
pub use types::{PlaybackConfig, PlaybackState, RepeatMode};
pub use volume::Volume;
