use crate::{play_events, playlists, tracks};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tunes_core::{
    PlayEvent, PlaylistId, Result, SmartPlaylistKind, SmartPlaylistStore, SmartPlaylistSummary,
    TrackId, UserId,
};

/// Local storage context using `SQLite`
#[derive(Debug, Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SmartPlaylistStore for LocalStorageContext {
    async fn get_play_events(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayEvent>> {
        Ok(play_events::since(&self.pool, user_id, since).await?)
    }

    async fn get_or_create_playlist(&self, user_id: &UserId, name: &str) -> Result<PlaylistId> {
        let kind = SmartPlaylistKind::from_name(name);
        let description = kind.map(SmartPlaylistKind::description);
        Ok(playlists::get_or_create(&self.pool, user_id, name, description, kind.is_some()).await?)
    }

    async fn replace_membership(
        &self,
        playlist_id: &PlaylistId,
        ordered_track_ids: &[TrackId],
    ) -> Result<()> {
        playlists::replace_membership(&self.pool, playlist_id, ordered_track_ids, Utc::now())
            .await?;
        tracing::debug!(
            "Replaced membership of playlist {} ({} tracks)",
            playlist_id,
            ordered_track_ids.len()
        );
        Ok(())
    }

    async fn artists_for_tracks(&self, track_ids: &[TrackId]) -> Result<HashMap<TrackId, String>> {
        Ok(tracks::artists_for(&self.pool, track_ids).await?)
    }

    async fn discovery_candidates(
        &self,
        user_id: &UserId,
        artists: &[String],
        limit: usize,
    ) -> Result<Vec<TrackId>> {
        Ok(tracks::discovery_candidates(&self.pool, user_id, artists, limit).await?)
    }

    async fn list_smart_playlists(&self, user_id: &UserId) -> Result<Vec<SmartPlaylistSummary>> {
        Ok(playlists::list_smart(&self.pool, user_id).await?)
    }
}
