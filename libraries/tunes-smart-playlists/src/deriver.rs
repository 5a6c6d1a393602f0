//! Smart playlist deriver
//!
//! Every job follows the same steps: locate-or-create the user's playlist,
//! compute the full candidate list, then replace the membership in one
//! store call. A failure at any step leaves the previous membership as it
//! was, and never stops the other jobs.

use crate::compute;
use crate::error::{DerivationError, Result};
use crate::settings::DerivationSettings;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};
use tunes_core::{PlayEvent, PlaylistId, SmartPlaylistKind, SmartPlaylistStore, TrackId, UserId};

/// Outcome of one successful job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub kind: SmartPlaylistKind,
    pub playlist_id: PlaylistId,
    pub track_count: usize,
}

/// Outcome of running every job for one user
#[derive(Debug, Default)]
pub struct DerivationReport {
    pub completed: Vec<JobSummary>,
    pub failures: Vec<DerivationError>,
}

impl DerivationReport {
    /// All jobs succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self, kind: SmartPlaylistKind) -> Option<&JobSummary> {
        self.completed.iter().find(|summary| summary.kind == kind)
    }

    pub fn failed_kinds(&self) -> Vec<SmartPlaylistKind> {
        self.failures.iter().filter_map(DerivationError::kind).collect()
    }
}

/// Recomputes a user's smart playlists from the play log
pub struct SmartPlaylistDeriver<S> {
    store: S,
    settings: DerivationSettings,
    rng: Mutex<StdRng>,
}

impl<S: SmartPlaylistStore> SmartPlaylistDeriver<S> {
    pub fn new(store: S, settings: DerivationSettings) -> Self {
        Self::with_rng(store, settings, StdRng::from_entropy())
    }

    /// Deriver with a reproducible Discover Weekly shuffle
    pub fn with_seed(store: S, settings: DerivationSettings, seed: u64) -> Self {
        Self::with_rng(store, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: S, settings: DerivationSettings, rng: StdRng) -> Self {
        Self {
            store,
            settings,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &DerivationSettings {
        &self.settings
    }

    /// Run all three jobs as of now
    pub async fn run_all(&self, user_id: &UserId) -> DerivationReport {
        self.run_all_at(user_id, Utc::now()).await
    }

    /// Run all three jobs with windows ending at `now`
    ///
    /// Jobs are independent: a failing job is logged and reported, and the
    /// remaining jobs still run.
    pub async fn run_all_at(&self, user_id: &UserId, now: DateTime<Utc>) -> DerivationReport {
        let mut report = DerivationReport::default();

        for kind in SmartPlaylistKind::ALL {
            match self.run_job_at(kind, user_id, now).await {
                Ok(summary) => report.completed.push(summary),
                Err(e) => {
                    error!("Smart playlist derivation for user {} failed: {}", user_id, e);
                    report.failures.push(e);
                }
            }
        }

        info!(
            "Derived smart playlists for user {}: {} completed, {} failed",
            user_id,
            report.completed.len(),
            report.failures.len()
        );
        report
    }

    /// Run a single job with its window ending at `now`
    pub async fn run_job_at(
        &self,
        kind: SmartPlaylistKind,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<JobSummary> {
        match kind {
            SmartPlaylistKind::RecentlyPlayed => self.run_recently_played_at(user_id, now).await,
            SmartPlaylistKind::WeeklyTop => self.run_weekly_top_at(user_id, now).await,
            SmartPlaylistKind::DiscoverWeekly => self.run_discover_weekly_at(user_id, now).await,
        }
    }

    /// Distinct plays of the recent window, most recent first
    pub async fn run_recently_played_at(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<JobSummary> {
        let kind = SmartPlaylistKind::RecentlyPlayed;
        let playlist_id = self.locate(kind, user_id).await?;

        let since = now - self.settings.recently_played_window();
        let events = self.plays_between(kind, user_id, since, now).await?;

        let track_ids = compute::recently_played(&events, self.settings.recently_played_limit);
        self.replace(kind, playlist_id, &track_ids).await
    }

    /// Most played tracks of the weekly window
    pub async fn run_weekly_top_at(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<JobSummary> {
        let kind = SmartPlaylistKind::WeeklyTop;
        let playlist_id = self.locate(kind, user_id).await?;

        let since = now - self.settings.weekly_top_window();
        let events = self.plays_between(kind, user_id, since, now).await?;

        let track_ids = compute::weekly_top(&events, self.settings.weekly_top_limit);
        self.replace(kind, playlist_id, &track_ids).await
    }

    /// Unplayed approved tracks by the user's top artists, shuffled
    pub async fn run_discover_weekly_at(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<JobSummary> {
        let kind = SmartPlaylistKind::DiscoverWeekly;
        let playlist_id = self.locate(kind, user_id).await?;

        let since = now - self.settings.discover_window();
        let events = self.plays_between(kind, user_id, since, now).await?;

        let played = compute::distinct_tracks(&events);
        let artists = if played.is_empty() {
            Default::default()
        } else {
            self.store
                .artists_for_tracks(&played)
                .await
                .map_err(|e| DerivationError::job(kind, e))?
        };

        let top_artists =
            compute::top_artists(&events, &artists, self.settings.discover_artist_count);
        debug!("Top artists for user {}: {:?}", user_id, top_artists);

        let candidates = if top_artists.is_empty() {
            Vec::new()
        } else {
            self.store
                .discovery_candidates(user_id, &top_artists, self.settings.discover_candidate_limit)
                .await
                .map_err(|e| DerivationError::job(kind, e))?
        };

        let track_ids = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            compute::discover_weekly(candidates, self.settings.discover_playlist_limit, &mut *rng)
        };
        self.replace(kind, playlist_id, &track_ids).await
    }

    /// Plays in `[since, now]`; plays stamped after `now` are left out
    async fn plays_between(
        &self,
        kind: SmartPlaylistKind,
        user_id: &UserId,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlayEvent>> {
        let mut events = self
            .store
            .get_play_events(user_id, since)
            .await
            .map_err(|e| DerivationError::job(kind, e))?;
        events.retain(|event| event.played_at <= now);
        Ok(events)
    }

    async fn locate(&self, kind: SmartPlaylistKind, user_id: &UserId) -> Result<PlaylistId> {
        self.store
            .get_or_create_playlist(user_id, kind.name())
            .await
            .map_err(|e| DerivationError::job(kind, e))
    }

    async fn replace(
        &self,
        kind: SmartPlaylistKind,
        playlist_id: PlaylistId,
        track_ids: &[TrackId],
    ) -> Result<JobSummary> {
        self.store
            .replace_membership(&playlist_id, track_ids)
            .await
            .map_err(|e| DerivationError::job(kind, e))?;

        info!("{} recomputed with {} tracks", kind.name(), track_ids.len());
        Ok(JobSummary {
            kind,
            playlist_id,
            track_count: track_ids.len(),
        })
    }
}
