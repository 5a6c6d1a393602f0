//! Domain types for Tunes

mod ids;
mod play_event;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId, UserId};
pub use play_event::PlayEvent;
pub use playlist::{SmartPlaylistKind, SmartPlaylistSummary};
pub use track::Track;
