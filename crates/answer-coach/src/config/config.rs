//! Configuration management for answer-coach.
//!
//! Handles loading and saving TOML configuration files with
//! cross-platform paths and atomic write operations.

use crate::{AppError, AppResult, config::ApiConfig};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Practice-server endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub(crate) fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Persist the configuration atomically (write temp file, rename).
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tmp_path = config_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &config_path)?;

        info!(config_path = ?config_path, "Configuration saved");

        Ok(())
    }

    fn create_default() -> AppResult<Self> {
        let config = Config::default();
        config.save()?;
        Ok(config)
    }

    fn config_path() -> AppResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "TonyMarkham", "answer-coach").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Could not determine config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
