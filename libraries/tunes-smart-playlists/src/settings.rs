//! Job limits and time windows

use crate::error::{DerivationError, Result};
use serde::{Deserialize, Serialize};

/// Limits and windows for the three jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationSettings {
    /// Recently Played looks back this many hours (default: 72)
    pub recently_played_window_hours: u32,

    /// Maximum Recently Played entries (default: 50)
    pub recently_played_limit: usize,

    /// Weekly Top looks back this many days (default: 7)
    pub weekly_top_window_days: u32,

    /// Maximum Weekly Top entries (default: 25)
    pub weekly_top_limit: usize,

    /// Discover Weekly derives top artists from this many days (default: 30)
    pub discover_window_days: u32,

    /// How many top artists seed discovery (default: 5)
    pub discover_artist_count: usize,

    /// Candidates fetched before shuffling (default: 30)
    pub discover_candidate_limit: usize,

    /// Maximum Discover Weekly entries (default: 20)
    pub discover_playlist_limit: usize,
}

impl Default for DerivationSettings {
    fn default() -> Self {
        Self {
            recently_played_window_hours: 72,
            recently_played_limit: 50,
            weekly_top_window_days: 7,
            weekly_top_limit: 25,
            discover_window_days: 30,
            discover_artist_count: 5,
            discover_candidate_limit: 30,
            discover_playlist_limit: 20,
        }
    }
}

impl DerivationSettings {
    pub fn recently_played_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.recently_played_window_hours))
    }

    pub fn weekly_top_window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.weekly_top_window_days))
    }

    pub fn discover_window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.discover_window_days))
    }

    /// Reject windows of zero length
    pub fn validate(&self) -> Result<()> {
        if self.recently_played_window_hours == 0
            || self.weekly_top_window_days == 0
            || self.discover_window_days == 0
        {
            return Err(DerivationError::InvalidSettings(
                "time windows must be at least one hour/day".to_string(),
            ));
        }
        Ok(())
    }
}
