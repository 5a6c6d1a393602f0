//! In-memory store collaborator with failure injection

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tunes_core::{
    PlayEvent, PlaylistId, Result, SmartPlaylistKind, SmartPlaylistStore, SmartPlaylistSummary,
    TrackId, TunesError, UserId,
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn ids(values: &[&str]) -> Vec<TrackId> {
    values.iter().map(|v| TrackId::new(*v)).collect()
}

#[derive(Debug, Clone)]
struct StoredPlaylist {
    owner: UserId,
    name: String,
    members: Vec<TrackId>,
    recomputed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    artist: Option<String>,
    approved: bool,
}

#[derive(Default)]
struct State {
    events: Vec<PlayEvent>,
    catalog: Vec<(TrackId, CatalogEntry)>,
    playlists: Vec<(PlaylistId, StoredPlaylist)>,
    fail_replace_for: HashSet<String>,
    fail_events: bool,
    replace_calls: usize,
}

/// Fake store mirroring the SQLite semantics
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&self, id: &str, artist: Option<&str>) {
        self.add_catalog(id, artist, true);
    }

    pub fn add_unapproved_track(&self, id: &str, artist: &str) {
        self.add_catalog(id, Some(artist), false);
    }

    fn add_catalog(&self, id: &str, artist: Option<&str>, approved: bool) {
        self.state.lock().unwrap().catalog.push((
            TrackId::new(id),
            CatalogEntry {
                artist: artist.map(str::to_string),
                approved,
            },
        ));
    }

    /// Record `count` plays of `track`, `ago` before `now()`
    pub fn play(&self, user: &UserId, track: &str, count: usize, ago: Duration) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state
                .events
                .push(PlayEvent::new(user.clone(), TrackId::new(track), now() - ago));
        }
    }

    pub fn fail_replace_for(&self, kind: SmartPlaylistKind) {
        self.state
            .lock()
            .unwrap()
            .fail_replace_for
            .insert(kind.name().to_string());
    }

    pub fn set_fail_events(&self, fail: bool) {
        self.state.lock().unwrap().fail_events = fail;
    }

    pub fn replace_calls(&self) -> usize {
        self.state.lock().unwrap().replace_calls
    }

    pub fn playlist_count(&self) -> usize {
        self.state.lock().unwrap().playlists.len()
    }

    /// Membership of the user's playlist for `kind`, if it exists
    pub fn members(&self, user: &UserId, kind: SmartPlaylistKind) -> Option<Vec<TrackId>> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(_, p)| &p.owner == user && p.name == kind.name())
            .map(|(_, p)| p.members.clone())
    }
}

#[async_trait]
impl SmartPlaylistStore for MemoryStore {
    async fn get_play_events(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayEvent>> {
        let state = self.state.lock().unwrap();
        if state.fail_events {
            return Err(TunesError::storage("play log unavailable"));
        }
        let mut events: Vec<PlayEvent> = state
            .events
            .iter()
            .filter(|e| &e.user_id == user_id && e.played_at >= since)
            .cloned()
            .collect();
        // Newest first; later inserts first on ties
        events.reverse();
        events.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        Ok(events)
    }

    async fn get_or_create_playlist(&self, user_id: &UserId, name: &str) -> Result<PlaylistId> {
        let mut state = self.state.lock().unwrap();
        if let Some((id, _)) = state
            .playlists
            .iter()
            .find(|(_, p)| &p.owner == user_id && p.name == name)
        {
            return Ok(id.clone());
        }
        let id = PlaylistId::generate();
        state.playlists.push((
            id.clone(),
            StoredPlaylist {
                owner: user_id.clone(),
                name: name.to_string(),
                members: Vec::new(),
                recomputed_at: None,
            },
        ));
        Ok(id)
    }

    async fn replace_membership(
        &self,
        playlist_id: &PlaylistId,
        ordered_track_ids: &[TrackId],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.replace_calls += 1;
        let fail_for = state.fail_replace_for.clone();
        let (_, playlist) = state
            .playlists
            .iter_mut()
            .find(|(id, _)| id == playlist_id)
            .ok_or_else(|| TunesError::not_found("Playlist", playlist_id.as_str()))?;
        if fail_for.contains(&playlist.name) {
            return Err(TunesError::storage("disk full"));
        }
        playlist.members = ordered_track_ids.to_vec();
        playlist.recomputed_at = Some(now());
        Ok(())
    }

    async fn artists_for_tracks(&self, track_ids: &[TrackId]) -> Result<HashMap<TrackId, String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .catalog
            .iter()
            .filter(|(id, _)| track_ids.contains(id))
            .filter_map(|(id, entry)| entry.artist.clone().map(|artist| (id.clone(), artist)))
            .collect())
    }

    async fn discovery_candidates(
        &self,
        user_id: &UserId,
        artists: &[String],
        limit: usize,
    ) -> Result<Vec<TrackId>> {
        let state = self.state.lock().unwrap();
        let played: HashSet<&TrackId> = state
            .events
            .iter()
            .filter(|e| &e.user_id == user_id)
            .map(|e| &e.track_id)
            .collect();
        let mut candidates: Vec<TrackId> = state
            .catalog
            .iter()
            .filter(|(id, entry)| {
                entry.approved
                    && !played.contains(id)
                    && entry.artist.as_ref().is_some_and(|a| artists.contains(a))
            })
            .map(|(id, _)| id.clone())
            .collect();
        candidates.sort();
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn list_smart_playlists(&self, user_id: &UserId) -> Result<Vec<SmartPlaylistSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .playlists
            .iter()
            .filter(|(_, p)| &p.owner == user_id)
            .filter_map(|(id, p)| {
                SmartPlaylistKind::from_name(&p.name).map(|kind| SmartPlaylistSummary {
                    id: id.clone(),
                    kind,
                    track_count: p.members.len(),
                    last_recomputed_at: p.recomputed_at,
                })
            })
            .collect())
    }
}
