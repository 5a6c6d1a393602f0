//! Tunes Jobs Library
//!
//! Configuration, store setup and scheduling for the smart playlist
//! derivation jobs.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::JobsConfig;
pub use error::{JobsError, Result};
pub use scheduler::{CycleSummary, Scheduler};

use tunes_storage::LocalStorageContext;

/// Open the SQLite store and bring its schema up to date
pub async fn open_store(database_url: &str) -> Result<LocalStorageContext> {
    let pool = tunes_storage::create_pool(database_url).await?;
    tunes_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");
    Ok(LocalStorageContext::new(pool))
}
