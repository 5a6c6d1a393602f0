//! Tunes - Smart Playlists
//!
//! Derives three per-user playlists from the append-only play log:
//!
//! - **Recently Played**: distinct tracks of the last 72 hours, most recent first (max 50)
//! - **Weekly Top Tracks**: tracks of the last 7 days by play count (max 25)
//! - **Discover Weekly**: unplayed approved tracks by the top 5 artists of the
//!   last 30 days, shuffled (max 20 out of 30 candidates)
//!
//! Playlists are a cache of the log: every run recomputes the full
//! membership and swaps it in atomically, so running the jobs any number of
//! times, in any order, converges on the same result.
//!
//! # Example
//!
//! ```rust,no_run
//! use tunes_core::UserId;
//! use tunes_smart_playlists::{DerivationSettings, SmartPlaylistDeriver};
//! use tunes_storage::{create_pool, run_migrations, LocalStorageContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tunes.db").await?;
//! run_migrations(&pool).await?;
//!
//! let deriver = SmartPlaylistDeriver::new(LocalStorageContext::new(pool), DerivationSettings::default());
//! let report = deriver.run_all(&UserId::new("listener-1")).await;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod compute;
mod deriver;
mod error;
mod settings;

pub use deriver::{DerivationReport, JobSummary, SmartPlaylistDeriver};
pub use error::{DerivationError, Result};
pub use settings::DerivationSettings;
