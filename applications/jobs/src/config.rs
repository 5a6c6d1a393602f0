/// Jobs configuration
use crate::error::{JobsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tunes_core::UserId;
use tunes_smart_playlists::DerivationSettings;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tunes-jobs.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobsConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_deriver")]
    pub deriver: DeriverSettings,

    /// Job limits and windows
    #[serde(default)]
    pub jobs: DerivationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeriverSettings {
    /// Users whose playlists `serve` and `run-once` recompute
    #[serde(default)]
    pub users: Vec<String>,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl JobsConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tunes-jobs.toml` is used
    /// when present. `TUNES_`-prefixed variables override the file, with
    /// `__` between nesting levels (`TUNES_DERIVER__INTERVAL_SECS`) and
    /// comma-separated `TUNES_DERIVER__USERS`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("deriver.users"),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from TOML text, without the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(JobsError::Config(
                "database URL is required (set TUNES_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self.deriver.interval_secs == 0 {
            return Err(JobsError::Config(
                "deriver.interval_secs must be greater than zero".to_string(),
            ));
        }

        if self.deriver.users.iter().any(|user| user.trim().is_empty()) {
            return Err(JobsError::Config("user ids must not be empty".to_string()));
        }

        self.jobs
            .validate()
            .map_err(|e| JobsError::Config(e.to_string()))
    }

    pub fn users(&self) -> Vec<UserId> {
        self.deriver.users.iter().map(UserId::new).collect()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.deriver.interval_secs)
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tunes.db".to_string()
}

fn default_deriver() -> DeriverSettings {
    DeriverSettings {
        users: Vec::new(),
        interval_secs: default_interval_secs(),
    }
}

fn default_interval_secs() -> u64 {
    3600
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            deriver: default_deriver(),
            jobs: DerivationSettings::default(),
        }
    }
}
