//! Tunes Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by the playback engine, the storage layer and the smart playlist
//! deriver.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlayEvent`, `SmartPlaylistKind`, ids
//! - **Collaborator Traits**: `SmartPlaylistStore` (play-event log + playlists)
//! - **Error Handling**: Unified `TunesError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunes_core::types::{SmartPlaylistKind, Track, TrackId};
//!
//! let track = Track::new("t1", "https://cdn.example/t1.mp3", "Blue in Green")
//!     .with_artist("Miles Davis");
//! assert_eq!(track.id, TrackId::new("t1"));
//! assert_eq!(SmartPlaylistKind::WeeklyTop.name(), "Weekly Top Tracks");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, TunesError};
pub use store::SmartPlaylistStore;
pub use types::{
    PlayEvent, PlaylistId, SmartPlaylistKind, SmartPlaylistSummary, Track, TrackId, UserId,
};
