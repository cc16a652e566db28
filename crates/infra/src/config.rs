//! Store configuration.
//!
//! Loaded from the environment by binaries, or from JSON where a config file is used:
//!
//! ```json
//! { "backend": "sqlite", "path": "store.db" }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_products::contract::DATABASE_NAME;

/// Environment variable selecting the database: a file path, or `:memory:`.
pub const DATABASE_ENV: &str = "STOCKROOM_DATABASE";

/// Value of [`DATABASE_ENV`] selecting the in-memory backend.
pub const MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid store config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where product rows live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local table; rows live as long as the owning host.
    Memory,
    /// SQLite database file, created if missing.
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(flatten)]
    pub backend: StorageBackend,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
        }
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::Sqlite { path: path.into() },
        }
    }

    /// Read [`DATABASE_ENV`]; unset means `store.db` in the working directory.
    pub fn from_env() -> Self {
        Self::from_database_value(std::env::var(DATABASE_ENV).ok())
    }

    pub fn from_database_value(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") => {
                tracing::debug!("{DATABASE_ENV} not set; using {DATABASE_NAME}");
                Self::sqlite(DATABASE_NAME)
            }
            Some(MEMORY_DATABASE) => Self::memory(),
            Some(path) => Self::sqlite(path),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::sqlite(DATABASE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_database_defaults_to_store_db() {
        assert_eq!(StoreConfig::from_database_value(None), StoreConfig::sqlite("store.db"));
        assert_eq!(
            StoreConfig::from_database_value(Some("  ".into())),
            StoreConfig::default()
        );
    }

    #[test]
    fn memory_marker_selects_memory_backend() {
        assert_eq!(
            StoreConfig::from_database_value(Some(":memory:".into())),
            StoreConfig::memory()
        );
    }

    #[test]
    fn any_other_value_is_a_sqlite_path() {
        assert_eq!(
            StoreConfig::from_database_value(Some("/tmp/shop.db".into())).backend,
            StorageBackend::Sqlite { path: "/tmp/shop.db".into() }
        );
    }

    #[test]
    fn parses_tagged_json() {
        let config = StoreConfig::from_json(r#"{"backend":"sqlite","path":"inventory.db"}"#).unwrap();
        assert_eq!(config, StoreConfig::sqlite("inventory.db"));

        let config = StoreConfig::from_json(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(config, StoreConfig::memory());
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(StoreConfig::from_json(r#"{"backend":"postgres"}"#).is_err());
    }
}
