//! Server Configuration
//!
//! JSON file with the database path and logging settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::MEMORY_DB;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Rolling log directory; no file logging when unset
    pub log_dir: Option<PathBuf>,
    pub app_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("menu.db"),
            log_dir: None,
            app_name: "MenuServer".to_string(),
        }
    }
}

impl ServerConfig {
    /// Config backed by a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(MEMORY_DB),
            ..Self::default()
        }
    }

    /// Read `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"db_path": ":memory:"}"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.db_path, PathBuf::from(MEMORY_DB));
        assert_eq!(config.app_name, "MenuServer");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ServerConfig {
            log_dir: Some(dir.path().join("logs")),
            ..ServerConfig::in_memory()
        };
        config.save(&path).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ServerConfig::load(&path).is_err());
    }
}
