/// Track domain type
use super::TrackId;
use serde::{Deserialize, Serialize};

/// Immutable description of a playable track
///
/// Serialized in camelCase because the same shape is embedded in
/// persisted playback snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Stable identifier
    pub id: TrackId,

    /// URI or path handed to the playback resource
    pub source_locator: String,

    /// Title shown to the listener
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_locator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Catalog duration in seconds, superseded once the resource reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_duration_hint: Option<f64>,
}

impl Track {
    /// Create a track with only the required fields
    pub fn new(
        id: impl Into<String>,
        source_locator: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            source_locator: source_locator.into(),
            display_name: display_name.into(),
            artist: None,
            artwork_locator: None,
            album: None,
            known_duration_hint: None,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the album
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the artwork locator
    #[must_use]
    pub fn with_artwork(mut self, artwork_locator: impl Into<String>) -> Self {
        self.artwork_locator = Some(artwork_locator.into());
        self
    }

    /// Set the catalog duration hint (seconds)
    #[must_use]
    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.known_duration_hint = Some(seconds);
        self
    }

    /// Whether both values refer to the same audio content
    pub fn is_same_track(&self, other: &Track) -> bool {
        self.id == other.id
    }
}
