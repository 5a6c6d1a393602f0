//! Call-level expectations on the store collaborator

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use mockall::predicate::eq;
use std::collections::HashMap;
use tunes_core::{
    PlayEvent, PlaylistId, Result, SmartPlaylistKind, SmartPlaylistStore, SmartPlaylistSummary,
    TrackId, TunesError, UserId,
};
use tunes_smart_playlists::{DerivationSettings, SmartPlaylistDeriver};

mock! {
    Store {}

    #[async_trait]
    impl SmartPlaylistStore for Store {
        async fn get_play_events(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<Vec<PlayEvent>>;
        async fn get_or_create_playlist(&self, user_id: &UserId, name: &str) -> Result<PlaylistId>;
        async fn replace_membership(&self, playlist_id: &PlaylistId, ordered_track_ids: &[TrackId]) -> Result<()>;
        async fn artists_for_tracks(&self, track_ids: &[TrackId]) -> Result<HashMap<TrackId, String>>;
        async fn discovery_candidates(&self, user_id: &UserId, artists: &[String], limit: usize) -> Result<Vec<TrackId>>;
        async fn list_smart_playlists(&self, user_id: &UserId) -> Result<Vec<SmartPlaylistSummary>>;
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn user() -> UserId {
    UserId::new("u1")
}

#[tokio::test]
async fn log_failure_never_touches_membership() {
    let mut store = MockStore::new();
    store
        .expect_get_or_create_playlist()
        .returning(|_, name| Ok(PlaylistId::new(name)));
    store
        .expect_get_play_events()
        .returning(|_, _| Err(TunesError::storage("locked")));
    store.expect_replace_membership().never();
    store.expect_artists_for_tracks().never();
    store.expect_discovery_candidates().never();

    let deriver = SmartPlaylistDeriver::with_seed(store, DerivationSettings::default(), 1);
    let report = deriver.run_all_at(&user(), now()).await;

    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.failed_kinds(), SmartPlaylistKind::ALL.to_vec());
}

#[tokio::test]
async fn locate_failure_skips_the_log() {
    let mut store = MockStore::new();
    store
        .expect_get_or_create_playlist()
        .returning(|_, _| Err(TunesError::storage("read only")));
    store.expect_get_play_events().never();
    store.expect_replace_membership().never();

    let deriver = SmartPlaylistDeriver::with_seed(store, DerivationSettings::default(), 1);
    let result = deriver.run_weekly_top_at(&user(), now()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn weekly_top_queries_seven_day_window() {
    let since = now() - chrono::Duration::days(7);
    let mut store = MockStore::new();
    store
        .expect_get_or_create_playlist()
        .withf(|user_id, name| *user_id == user() && name == "Weekly Top Tracks")
        .times(1)
        .returning(|_, _| Ok(PlaylistId::new("p-weekly")));
    store
        .expect_get_play_events()
        .with(eq(user()), eq(since))
        .times(1)
        .returning(|user_id, _| {
            Ok(vec![
                PlayEvent::new(user_id.clone(), TrackId::new("x"), now()),
                PlayEvent::new(user_id.clone(), TrackId::new("y"), now()),
                PlayEvent::new(user_id.clone(), TrackId::new("y"), now()),
            ])
        });
    store
        .expect_replace_membership()
        .withf(|playlist_id, ids| {
            playlist_id.as_str() == "p-weekly" && ids == [TrackId::new("y"), TrackId::new("x")]
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let deriver = SmartPlaylistDeriver::with_seed(store, DerivationSettings::default(), 1);
    let summary = deriver.run_weekly_top_at(&user(), now()).await.unwrap();

    assert_eq!(summary.track_count, 2);
}

#[tokio::test]
async fn discovery_without_known_artists_skips_candidate_query() {
    let mut store = MockStore::new();
    store
        .expect_get_or_create_playlist()
        .returning(|_, _| Ok(PlaylistId::new("p-discover")));
    store.expect_get_play_events().returning(|user_id, _| {
        Ok(vec![PlayEvent::new(user_id.clone(), TrackId::new("orphan"), now())])
    });
    store
        .expect_artists_for_tracks()
        .times(1)
        .returning(|_| Ok(HashMap::new()));
    store.expect_discovery_candidates().never();
    store
        .expect_replace_membership()
        .withf(|_, ids| ids.is_empty())
        .times(1)
        .returning(|_, _| Ok(()));

    let deriver = SmartPlaylistDeriver::with_seed(store, DerivationSettings::default(), 1);
    let summary = deriver.run_discover_weekly_at(&user(), now()).await.unwrap();

    assert_eq!(summary.track_count, 0);
}

#[tokio::test]
async fn discovery_asks_for_configured_candidate_count() {
    let settings = DerivationSettings {
        discover_candidate_limit: 12,
        discover_playlist_limit: 4,
        ..DerivationSettings::default()
    };
    let mut store = MockStore::new();
    store
        .expect_get_or_create_playlist()
        .returning(|_, _| Ok(PlaylistId::new("p-discover")));
    store.expect_get_play_events().returning(|user_id, _| {
        Ok(vec![PlayEvent::new(user_id.clone(), TrackId::new("seed"), now())])
    });
    store.expect_artists_for_tracks().returning(|_| {
        Ok([(TrackId::new("seed"), "Artist".to_string())].into_iter().collect())
    });
    store
        .expect_discovery_candidates()
        .withf(|_, artists, limit| artists == ["Artist".to_string()] && *limit == 12)
        .times(1)
        .returning(|_, _, limit| Ok((0..limit).map(|i| TrackId::new(format!("c{}", i))).collect()));
    store
        .expect_replace_membership()
        .withf(|_, ids| ids.len() == 4)
        .times(1)
        .returning(|_, _| Ok(()));

    let deriver = SmartPlaylistDeriver::with_seed(store, settings, 1);
    deriver.run_discover_weekly_at(&user(), now()).await.unwrap();
}
