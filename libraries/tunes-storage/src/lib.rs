//! Tunes Storage
//!
//! `SQLite` database layer backing the smart playlist deriver.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each table family owns its own queries
//!   (`tracks`, `play_events`, `playlists`)
//! - **Append-only log**: play events are only ever inserted; derived
//!   playlists are a cache rebuilt from the log
//! - **Atomic replacement**: playlist membership is swapped inside one
//!   transaction, so a failed recompute keeps the previous membership
//!
//! # Example
//!
//! ```rust,no_run
//! use tunes_storage::{LocalStorageContext, create_pool, run_migrations};
//! use tunes_core::{SmartPlaylistStore, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tunes.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let playlists = storage.list_smart_playlists(&UserId::new("listener-1")).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod play_events;
pub mod playlists;
pub mod tracks;

pub use context::LocalStorageContext;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before any other query.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tunes.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal) // concurrent readers while the deriver writes
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");
    Ok(pool)
}

/// Epoch millis to UTC, rejecting out-of-range values
pub(crate) fn timestamp_from_millis(
    millis: i64,
) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::Query(format!("Invalid timestamp: {}", millis)))
}
