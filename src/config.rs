//! Configuration management for plexsync.
//!
//! Configuration comes from environment variables and an optional `.env` file in
//! the local data directory. It is read exactly once into a [`Settings`] value,
//! which is then passed by reference to the clients and managers that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{SyncError, retry::RetryPolicy};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_PLEX_MUSIC_SECTION: &str = "Music";
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `plexsync` data directory if it doesn't exist. A missing `.env`
/// file is not an error: every setting can also come from the process
/// environment, which always takes precedence over the file.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/plexsync/.env`
/// - macOS: `~/Library/Application Support/plexsync/.env`
/// - Windows: `%LOCALAPPDATA%/plexsync/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the plexsync directory inside the platform's local data directory.
///
/// # Returns
///
/// `<local data dir>/plexsync`, or `./plexsync` when the platform has no local
/// data directory. The directory is not created here; see [`load_env`].
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plexsync");
    path
}

/// Settings for the optional assistant used during disambiguation.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub api_key: String,
    /// Base URL without the `/v1/messages` path.
    pub api_url: String,
    pub model: String,
}

/// The complete runtime configuration.
///
/// Built once at startup and shared by reference. Credentials are never
/// re-read from the environment after construction.
#[derive(Debug, Clone)]
pub struct Settings {
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub plex_url: String,
    pub plex_token: String,
    pub plex_music_section: String,
    /// `None` disables assisted disambiguation.
    pub assistant: Option<AssistantSettings>,
    pub backup_dir: PathBuf,
    pub log_dir: PathBuf,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// Call [`load_env`] first so values from the `.env` file are visible.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Settings)` - Complete configuration with defaults applied
    /// - `Err(SyncError)` - Configuration is incomplete or malformed
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] naming the first missing required key or the
    /// first malformed numeric value.
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent, so a `.env` line like
    /// `ANTHROPIC_API_KEY=` leaves the assistant disabled.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value for a key, or `None` when unset
    ///
    /// # Required Keys
    ///
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `PLEX_URL` and `PLEX_TOKEN`.
    /// Every other key falls back to a default.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if a required key is missing or a retry
    /// setting (`PLEXSYNC_RETRY_*`) is not a whole number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| SyncError::Config(format!("{} must be set", key)))
        };
        let seconds = |key: &str, default: u64| -> Result<u64, SyncError> {
            match get(key) {
                Some(v) => v
                    .parse::<u64>()
                    .map_err(|_| SyncError::Config(format!("{} must be a whole number", key))),
                None => Ok(default),
            }
        };

        let assistant = get("ANTHROPIC_API_KEY").map(|api_key| AssistantSettings {
            api_key,
            api_url: get("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_URL.to_string()),
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
        });

        let retry = RetryPolicy {
            max_attempts: seconds("PLEXSYNC_RETRY_ATTEMPTS", 3)? as u32,
            initial_backoff: Duration::from_secs(seconds("PLEXSYNC_RETRY_INITIAL_SECS", 4)?),
            max_backoff: Duration::from_secs(seconds("PLEXSYNC_RETRY_MAX_SECS", 10)?),
        };

        Ok(Self {
            spotify_api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            spotify_token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            plex_url: required("PLEX_URL")?.trim_end_matches('/').to_string(),
            plex_token: required("PLEX_TOKEN")?,
            plex_music_section: get("PLEX_MUSIC_SECTION")
                .unwrap_or_else(|| DEFAULT_PLEX_MUSIC_SECTION.to_string()),
            assistant,
            backup_dir: get("PLEXSYNC_BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("backups")),
            log_dir: get("PLEXSYNC_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("logs")),
            retry,
        })
    }
}
