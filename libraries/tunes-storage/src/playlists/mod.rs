use crate::error::{Result, StorageError};
use crate::timestamp_from_millis;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tunes_core::{PlaylistId, SmartPlaylistKind, SmartPlaylistSummary, TrackId, UserId};

/// Find the owner's playlist called `name`, creating it when missing
///
/// Safe against concurrent creators: the `(owner_id, name)` uniqueness
/// constraint makes the insert a no-op for the loser.
pub async fn get_or_create(
    pool: &SqlitePool,
    owner_id: &UserId,
    name: &str,
    description: Option<&str>,
    is_smart: bool,
) -> Result<PlaylistId> {
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, name, description, is_smart, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(owner_id, name) DO NOTHING
        "#,
    )
    .bind(PlaylistId::generate().as_str())
    .bind(owner_id.as_str())
    .bind(name)
    .bind(description)
    .bind(is_smart)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id: String = sqlx::query_scalar("SELECT id FROM playlists WHERE owner_id = ? AND name = ?")
        .bind(owner_id.as_str())
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(PlaylistId::new(id))
}

/// Replace the whole membership of a playlist in one transaction
///
/// Positions are 1-based in the given order. Either the new membership is
/// committed and `last_recomputed_at` stamped, or nothing changes.
pub async fn replace_membership(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    ordered_track_ids: &[TrackId],
    recomputed_at: DateTime<Utc>,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE playlists SET last_recomputed_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(recomputed_at.timestamp_millis())
    .bind(recomputed_at.timestamp())
    .bind(playlist_id.as_str())
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // Dropping the transaction rolls it back
        return Err(StorageError::not_found("Playlist", playlist_id.as_str()));
    }

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(playlist_id.as_str())
        .execute(&mut *tx)
        .await?;

    for (position, track_id) in (1_i64..).zip(ordered_track_ids) {
        sqlx::query(
            "INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (?, ?, ?)",
        )
        .bind(playlist_id.as_str())
        .bind(track_id.as_str())
        .bind(position)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Track ids of a playlist in position order
pub async fn get_membership(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TrackId::new(row.get::<String, _>("track_id")))
        .collect())
}

/// The owner's smart playlists with member counts, ordered by name
pub async fn list_smart(pool: &SqlitePool, owner_id: &UserId) -> Result<Vec<SmartPlaylistSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.name, p.last_recomputed_at, COUNT(pt.track_id) AS track_count
        FROM playlists p
        LEFT JOIN playlist_tracks pt ON pt.playlist_id = p.id
        WHERE p.owner_id = ? AND p.is_smart = 1
        GROUP BY p.id, p.name, p.last_recomputed_at
        ORDER BY p.name
        "#,
    )
    .bind(owner_id.as_str())
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.get("name");
        let Some(kind) = SmartPlaylistKind::from_name(&name) else {
            tracing::warn!("Skipping smart playlist with unknown name {:?}", name);
            continue;
        };

        let last_recomputed_at = row
            .get::<Option<i64>, _>("last_recomputed_at")
            .map(timestamp_from_millis)
            .transpose()?;

        summaries.push(SmartPlaylistSummary {
            id: PlaylistId::new(row.get::<String, _>("id")),
            kind,
            track_count: usize::try_from(row.get::<i64, _>("track_count")).unwrap_or(0),
            last_recomputed_at,
        });
    }

    Ok(summaries)
}
