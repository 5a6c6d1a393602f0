//! Configuration loading tests

use std::io::Write;
use tunes_core::UserId;
use tunes_jobs::{JobsConfig, JobsError};

#[test]
fn toml_overrides_defaults() {
    let config = JobsConfig::from_toml_str(
        r#"
        [storage]
        database_url = "sqlite:///var/lib/tunes/tunes.db"

        [deriver]
        users = ["alice", "bob"]
        interval_secs = 900

        [jobs]
        weekly_top_limit = 10
        discover_window_days = 14
        "#,
    )
    .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.storage.database_url, "sqlite:///var/lib/tunes/tunes.db");
    assert_eq!(config.users(), vec![UserId::new("alice"), UserId::new("bob")]);
    assert_eq!(config.interval(), std::time::Duration::from_secs(900));
    assert_eq!(config.jobs.weekly_top_limit, 10);
    assert_eq!(config.jobs.discover_window_days, 14);
    // Untouched limits keep their defaults
    assert_eq!(config.jobs.recently_played_limit, 50);
    assert_eq!(config.jobs.discover_playlist_limit, 20);
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[deriver]\nusers = [\"carol\"]\ninterval_secs = 60").unwrap();

    let config = JobsConfig::load(Some(&path)).unwrap();

    assert_eq!(config.users(), vec![UserId::new("carol")]);
    assert_eq!(config.deriver.interval_secs, 60);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = JobsConfig::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(JobsError::Config(_))));
}

#[test]
fn zero_window_fails_validation() {
    let config = JobsConfig::from_toml_str("[jobs]\nrecently_played_window_hours = 0").unwrap();

    assert!(matches!(config.validate(), Err(JobsError::Config(_))));
}
