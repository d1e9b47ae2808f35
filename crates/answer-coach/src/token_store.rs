//! Persistence of the bearer token between runs.
//!
//! The token is an opaque credential: stored as-is in a file under the
//! platform data dir and handed to [`ApiClient`](crate::api::ApiClient)
//! explicitly. Nothing else in the app reads it ambiently.

use crate::{AppError, AppResult, api::types::AuthToken};

use std::{fs, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Load the persisted token, if a previous session saved one.
#[track_caller]
#[instrument]
pub(crate) fn load() -> AppResult<Option<AuthToken>> {
    let path = token_path()?;

    if !path.exists() {
        debug!("No persisted token");
        return Ok(None);
    }

    let raw = fs::read_to_string(&path)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    debug!(path = ?path, "Token loaded");
    Ok(Some(AuthToken::new(trimmed.to_string())))
}

/// Persist the token for the next run.
#[track_caller]
#[instrument(skip(token))]
pub(crate) fn save(token: &AuthToken) -> AppResult<()> {
    let path = token_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, token.as_str())?;
    info!(path = ?path, "Token saved");

    Ok(())
}

/// Remove the persisted token (logout).
#[track_caller]
#[instrument]
pub(crate) fn clear() -> AppResult<()> {
    let path = token_path()?;

    if path.exists() {
        fs::remove_file(&path)?;
        info!("Token cleared");
    }

    Ok(())
}

fn token_path() -> AppResult<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "TonyMarkham", "answer-coach").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Could not determine data directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

    Ok(dirs.data_dir().join("token"))
}
