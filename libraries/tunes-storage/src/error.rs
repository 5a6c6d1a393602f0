/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Query produced data that cannot be mapped
    #[error("Query error: {0}")]
    Query(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for tunes_core::TunesError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => tunes_core::TunesError::not_found(entity, id),
            other => tunes_core::TunesError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunes_core::TunesError;

    #[test]
    fn not_found_keeps_entity_when_converted() {
        let err: TunesError = StorageError::not_found("Playlist", "p-9").into();
        assert!(matches!(
            err,
            TunesError::NotFound { ref entity, ref id } if entity == "Playlist" && id == "p-9"
        ));
    }

    #[test]
    fn database_errors_become_storage_errors() {
        let err: TunesError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, TunesError::Storage(_)));
    }
}
