use crate::error::Result;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use tunes_core::{TrackId, UserId};

/// Maximum bound parameters per `IN (...)` chunk
const IN_CHUNK: usize = 500;

/// Catalog entry as seen by the deriver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,

    /// Only approved tracks are ever suggested
    pub approved: bool,
}

impl CatalogTrack {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: None,
            approved: true,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn unapproved(mut self) -> Self {
        self.approved = false;
        self
    }
}

/// Insert a catalog track
pub async fn insert(pool: &SqlitePool, track: &CatalogTrack) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tracks (id, title, artist, approved, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(track.id.as_str())
    .bind(&track.title)
    .bind(&track.artist)
    .bind(track.approved)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    Ok(())
}

/// Get catalog track by ID
pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<CatalogTrack>> {
    let row = sqlx::query("SELECT id, title, artist, approved FROM tracks WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| CatalogTrack {
        id: TrackId::new(row.get::<String, _>("id")),
        title: row.get("title"),
        artist: row.get("artist"),
        approved: row.get::<i64, _>("approved") != 0,
    }))
}

/// Artist of each listed track; unknown tracks and tracks without an artist are omitted
pub async fn artists_for(
    pool: &SqlitePool,
    track_ids: &[TrackId],
) -> Result<HashMap<TrackId, String>> {
    let mut artists = HashMap::with_capacity(track_ids.len());

    for chunk in track_ids.chunks(IN_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, artist FROM tracks WHERE artist IS NOT NULL AND id IN (");
        let mut separated = qb.separated(", ");
        for id in chunk {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let rows = qb.build().fetch_all(pool).await?;
        for row in rows {
            artists.insert(
                TrackId::new(row.get::<String, _>("id")),
                row.get::<String, _>("artist"),
            );
        }
    }

    Ok(artists)
}

/// Approved tracks by `artists` that `user_id` has never played
///
/// Exclusion is an anti-join against the play log, so it stays a single
/// bounded query however long the listening history grows.
pub async fn discovery_candidates(
    pool: &SqlitePool,
    user_id: &UserId,
    artists: &[String],
    limit: usize,
) -> Result<Vec<TrackId>> {
    if artists.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT t.id
        FROM tracks t
        WHERE t.approved = 1
          AND NOT EXISTS (
              SELECT 1 FROM play_events pe
              WHERE pe.track_id = t.id AND pe.user_id = "#,
    );
    qb.push_bind(user_id.as_str());
    qb.push(
        r#"
          )
          AND t.artist IN ("#,
    );
    let mut separated = qb.separated(", ");
    for artist in artists {
        separated.push_bind(artist.as_str());
    }
    separated.push_unseparated(") ORDER BY t.id LIMIT ");
    qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| TrackId::new(row.get::<String, _>("id")))
        .collect())
}
