//! Store configuration
//!
//! `StoreConfig` is the single source of truth for how the store is opened.
//! It can be read from a JSON file (every field optional, so older files keep
//! working) and then overridden from the environment:
//!
//! - `HEATTREE_DB_PATH`: database file path
//! - `HEATTREE_BUSY_TIMEOUT_MS`: SQLite busy timeout in milliseconds

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_DB_PATH: &str = "HEATTREE_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "HEATTREE_BUSY_TIMEOUT_MS";

pub const DEFAULT_DB_FILE: &str = "heattree.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Broadcast channel capacity for tree events.
///
/// Subscribers that fall further behind than this lose the oldest events.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How to open and run the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// How long a connection waits on a locked database before failing
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl StoreConfig {
    /// Default settings for the database at `database_path`
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; a missing file yields the defaults
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply `HEATTREE_*` environment overrides on top of `self`
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_DB_PATH).ok(),
            std::env::var(ENV_BUSY_TIMEOUT_MS).ok(),
        )
    }

    fn with_overrides(mut self, db_path: Option<String>, busy_timeout: Option<String>) -> Self {
        if let Some(path) = db_path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(raw) = busy_timeout {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.busy_timeout_ms = ms,
                Err(_) => tracing::warn!(
                    "Ignoring {}={:?}: not a number of milliseconds",
                    ENV_BUSY_TIMEOUT_MS,
                    raw
                ),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.event_channel_capacity, DEFAULT_EVENT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_overrides_replace_path_and_timeout() {
        let config = StoreConfig::default().with_overrides(
            Some("/tmp/records.db".to_string()),
            Some(" 250 ".to_string()),
        );
        assert_eq!(config.database_path, PathBuf::from("/tmp/records.db"));
        assert_eq!(config.busy_timeout_ms, 250);
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let config = StoreConfig::new("a.db").with_overrides(None, Some("soon".to_string()));
        assert_eq!(config.database_path, PathBuf::from("a.db"));
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[tokio::test]
    async fn test_load_partial_file_uses_defaults_for_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("heattree.json");
        tokio::fs::write(&path, r#"{ "databasePath": "/data/tree.db" }"#)
            .await
            .unwrap();

        let config = StoreConfig::load(&path).await.unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/tree.db"));
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::load(&temp_dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            StoreConfig::load(&path).await,
            Err(ConfigError::Parse { .. })
        ));
    }
}
