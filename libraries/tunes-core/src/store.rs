//! Store collaborator consumed by the smart playlist deriver

use crate::error::Result;
use crate::types::{PlayEvent, PlaylistId, SmartPlaylistSummary, TrackId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Relational store holding the play-event log, the catalog and playlists
///
/// The log and playlists may be touched concurrently by other processes;
/// implementations provide no locking beyond what each call needs.
#[async_trait]
pub trait SmartPlaylistStore: Send + Sync {
    /// Play events of `user_id` with `played_at >= since`, newest first
    async fn get_play_events(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayEvent>>;

    /// Find the user's playlist with this name, creating it when missing
    async fn get_or_create_playlist(&self, user_id: &UserId, name: &str) -> Result<PlaylistId>;

    /// Replace the whole membership of a playlist
    ///
    /// Must be all-or-nothing: on error the previous membership is kept.
    async fn replace_membership(
        &self,
        playlist_id: &PlaylistId,
        ordered_track_ids: &[TrackId],
    ) -> Result<()>;

    /// Catalog artist for each known track (tracks without an artist are omitted)
    async fn artists_for_tracks(&self, track_ids: &[TrackId]) -> Result<HashMap<TrackId, String>>;

    /// Approved catalog tracks by `artists` the user has never played
    async fn discovery_candidates(
        &self,
        user_id: &UserId,
        artists: &[String],
        limit: usize,
    ) -> Result<Vec<TrackId>>;

    /// The user's smart playlists with their current sizes
    async fn list_smart_playlists(&self, user_id: &UserId) -> Result<Vec<SmartPlaylistSummary>>;
}
