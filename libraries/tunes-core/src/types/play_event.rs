/// Play-event log entry
use super::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the append-only play log
///
/// Owned by the store collaborator; the engine only reads ranges of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub user_id: UserId,
    pub track_id: TrackId,
    pub played_at: DateTime<Utc>,
}

impl PlayEvent {
    /// Create a play event
    pub fn new(user_id: UserId, track_id: TrackId, played_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            track_id,
            played_at,
        }
    }
}
