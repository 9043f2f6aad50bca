//! Runtime configuration for storage, export and logging locations.
//!
//! # Responsibility
//! - Resolve where the key-value database and exported file live.
//! - Resolve the log level with build-mode defaults.
//!
//! # Invariants
//! - Explicit values win over environment, environment wins over defaults.
//! - Empty or whitespace-only environment values are ignored.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ENCUESTA_DATA_DIR";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "ENCUESTA_LOG_LEVEL";

pub const DEFAULT_DB_FILE_NAME: &str = "encuestas.sqlite3";
/// Fixed, overwritable export file name.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "encuestas.csv";
const DEFAULT_DATA_SUBDIR: &str = "encuestas";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the database, exports and logs.
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub export_file_name: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join(DEFAULT_DATA_SUBDIR),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl AppConfig {
    /// Builds a config from the process environment over defaults.
    pub fn from_env() -> Self {
        Self::resolve(
            env_value(DATA_DIR_ENV).map(PathBuf::from),
            env_value(LOG_LEVEL_ENV),
        )
    }

    /// Builds a config with explicit overrides over defaults.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        if let Some(level) = log_level.filter(|value| !value.trim().is_empty()) {
            config.log_level = level;
        }
        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Directory the export file is written to.
    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn env_value(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn resolve_prefers_explicit_values() {
        let config = AppConfig::resolve(Some(PathBuf::from("/data/x")), Some("warn".to_string()));
        assert_eq!(config.db_path(), PathBuf::from("/data/x/encuestas.sqlite3"));
        assert_eq!(config.export_dir(), PathBuf::from("/data/x"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_level_falls_back_to_default() {
        let config = AppConfig::resolve(None, Some("   ".to_string()));
        assert_eq!(config.log_level, AppConfig::default().log_level);
        assert_eq!(config.export_file_name, "encuestas.csv");
    }
}
