use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::catalog::DEFAULT_MARKER;
use crate::catalog::sections::SectionConfig;
use crate::recency::DEFAULT_THRESHOLD_DAYS;
use crate::search::DEFAULT_LIMIT;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults; the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Custom database path (overrides XDG default).
    pub db_path: Option<PathBuf>,
    /// Base catalog, one song per line.
    pub catalog_file: Option<PathBuf>,
    /// Prefix that marks songs of the secondary collection.
    pub marker_prefix: String,
    /// Repeats within this many days ask for confirmation.
    pub recency_days: i64,
    /// Maximum number of search suggestions.
    pub suggest_limit: usize,
    /// Heading used in shared service reports.
    pub report_title: String,
    /// Middle part of backup file names: `backup_<context>_<date>.json`.
    pub backup_context: String,
    /// Period labels offered for a service.
    pub periods: Vec<String>,
    /// Numbered sections of the primary and marked collections.
    pub sections: SectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            catalog_file: None,
            marker_prefix: DEFAULT_MARKER.to_string(),
            recency_days: DEFAULT_THRESHOLD_DAYS,
            suggest_limit: DEFAULT_LIMIT,
            report_title: "Service Report".to_string(),
            backup_context: "church".to_string(),
            periods: vec!["Morning".to_string(), "Evening".to_string(), "Special".to_string()],
            sections: SectionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/servicebook/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Resolve the default database path using XDG data directory.
pub fn default_db_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok();
        data_dir.join("servicebook.db")
    } else {
        // Fallback: current directory
        PathBuf::from("servicebook.db")
    }
}
