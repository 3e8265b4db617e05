//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path and logging settings from `CATALOG_*` variables.
//!
//! # Invariants
//! - Empty variables are treated as unset.
//! - A configured log directory is always absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "CATALOG_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "CATALOG_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CATALOG_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "catalog.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Logging {
        var: &'static str,
        source: LoggingError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging { var, source } => write!(f, "invalid {var}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging { source, .. } => Some(source),
        }
    }
}

/// Resolved settings for opening the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let db_path = read(DB_PATH_VAR).map_or(defaults.db_path, PathBuf::from);

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level).map_err(|source| ConfigError::Logging {
                var: LOG_LEVEL_VAR,
                source,
            })?,
            None => defaults.log_level,
        };

        let log_dir = read(LOG_DIR_VAR)
            .map(|dir| normalize_log_dir(&PathBuf::from(dir.trim())))
            .transpose()
            .map_err(|source| ConfigError::Logging {
                var: LOG_DIR_VAR,
                source,
            })?;

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, ConfigError, DEFAULT_DB_FILE_NAME};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CatalogConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn variables_override_defaults() {
        let log_dir = std::env::temp_dir().join("catalog-logs");
        let config = config_from(&[
            ("CATALOG_DB_PATH", "/var/lib/catalog/products.db"),
            ("CATALOG_LOG_LEVEL", "Warning"),
            ("CATALOG_LOG_DIR", log_dir.to_str().unwrap()),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/catalog/products.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = config_from(&[("CATALOG_DB_PATH", "  "), ("CATALOG_LOG_DIR", "")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn invalid_logging_values_are_rejected() {
        let err = config_from(&[("CATALOG_LOG_LEVEL", "verbose")]).unwrap_err();
        assert!(err.to_string().contains("CATALOG_LOG_LEVEL"));

        let err = config_from(&[("CATALOG_LOG_DIR", "relative/logs")]).unwrap_err();
        assert!(err.to_string().contains("CATALOG_LOG_DIR"));
    }
}
