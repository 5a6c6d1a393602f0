//! Integration tests for the store collaborator implementation


use chrono::Duration;
use test_helpers::*;
use tunes_core::{SmartPlaylistKind, SmartPlaylistStore, TrackId, TunesError, UserId};
use tunes_storage::LocalStorageContext;

#[tokio::test]
async fn test_context_round_trip() {
    let test_db = TestDb::new().await;
    let store = LocalStorageContext::new(test_db.pool().clone());
    let user = UserId::new("listener");

    create_test_track(store.pool(), "a", Some("Alice Coltrane")).await;
    record_plays(store.pool(), &user, "a", 2, Duration::hours(1)).await;

    let events = store
        .get_play_events(&user, reference_now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(events.len(), 2);

    let name = SmartPlaylistKind::WeeklyTop.name();
    let playlist = store.get_or_create_playlist(&user, name).await.unwrap();
    assert_eq!(store.get_or_create_playlist(&user, name).await.unwrap(), playlist);

    store
        .replace_membership(&playlist, &[TrackId::new("a")])
        .await
        .unwrap();

    let summaries = store.list_smart_playlists(&user).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, playlist);
    assert_eq!(summaries[0].track_count, 1);
    assert!(summaries[0].last_recomputed_at.is_some());

    let artists = store.artists_for_tracks(&[TrackId::new("a")]).await.unwrap();
    assert_eq!(artists[&TrackId::new("a")], "Alice Coltrane");
}

#[tokio::test]
async fn test_non_smart_names_are_not_listed() {
    let test_db = TestDb::new().await;
    let store = LocalStorageContext::new(test_db.pool().clone());
    let user = UserId::new("listener");

    store.get_or_create_playlist(&user, "Favorites").await.unwrap();

    assert!(store.list_smart_playlists(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_replace_on_missing_playlist_maps_to_not_found() {
    let test_db = TestDb::new().await;
    let store = LocalStorageContext::new(test_db.pool().clone());

    let err = store
        .replace_membership(&tunes_core::PlaylistId::new("missing"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, TunesError::NotFound { .. }));
}
