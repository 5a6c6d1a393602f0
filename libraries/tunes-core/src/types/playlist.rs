/// Smart playlist domain types
use super::PlaylistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The derived playlists maintained for every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmartPlaylistKind {
    /// Deduplicated plays of the last 72 hours, most recent first
    RecentlyPlayed,

    /// Most played tracks of the last 7 days
    WeeklyTop,

    /// Unplayed tracks by the listener's top artists
    DiscoverWeekly,
}

impl SmartPlaylistKind {
    /// Every kind, in the order the deriver runs them
    pub const ALL: [SmartPlaylistKind; 3] = [
        SmartPlaylistKind::RecentlyPlayed,
        SmartPlaylistKind::WeeklyTop,
        SmartPlaylistKind::DiscoverWeekly,
    ];

    /// Playlist name as stored for the user
    pub fn name(self) -> &'static str {
        match self {
            SmartPlaylistKind::RecentlyPlayed => "Recently Played",
            SmartPlaylistKind::WeeklyTop => "Weekly Top Tracks",
            SmartPlaylistKind::DiscoverWeekly => "Discover Weekly",
        }
    }

    /// Human readable description
    pub fn description(self) -> &'static str {
        match self {
            SmartPlaylistKind::RecentlyPlayed => "Your recently played tracks (last 72 hours)",
            SmartPlaylistKind::WeeklyTop => "Your most played tracks this week",
            SmartPlaylistKind::DiscoverWeekly => "New tracks based on your listening habits",
        }
    }

    /// Look a kind up by its stored name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Listing entry for a user's smart playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartPlaylistSummary {
    pub id: PlaylistId,
    pub kind: SmartPlaylistKind,
    pub track_count: usize,

    /// `None` until the first successful recompute
    pub last_recomputed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in SmartPlaylistKind::ALL {
            assert_eq!(SmartPlaylistKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(SmartPlaylistKind::from_name("Favorites"), None);
    }
}
