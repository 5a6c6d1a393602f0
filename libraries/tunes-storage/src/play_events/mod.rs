use crate::error::Result;
use crate::timestamp_from_millis;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tunes_core::{PlayEvent, TrackId, UserId};

/// Append a play to the log, returning its row id
pub async fn record(pool: &SqlitePool, event: &PlayEvent) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO play_events (user_id, track_id, played_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(event.user_id.as_str())
    .bind(event.track_id.as_str())
    .bind(event.played_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Plays of `user_id` at or after `since`, newest first
///
/// Plays sharing a timestamp come back in reverse insertion order.
pub async fn since(
    pool: &SqlitePool,
    user_id: &UserId,
    since: DateTime<Utc>,
) -> Result<Vec<PlayEvent>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, track_id, played_at
        FROM play_events
        WHERE user_id = ? AND played_at >= ?
        ORDER BY played_at DESC, id DESC
        "#,
    )
    .bind(user_id.as_str())
    .bind(since.timestamp_millis())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(PlayEvent {
                user_id: UserId::new(row.get::<String, _>("user_id")),
                track_id: TrackId::new(row.get::<String, _>("track_id")),
                played_at: timestamp_from_millis(row.get::<i64, _>("played_at"))?,
            })
        })
        .collect()
}

/// Total plays recorded for a user
pub async fn count_for_user(pool: &SqlitePool, user_id: &UserId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM play_events WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
