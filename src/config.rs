//! Configuration management for the SoundCloud module.
//!
//! The host normally injects settings directly through [`ModuleSettings`]. For
//! standalone use the settings can also be read from environment variables and
//! a `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Module defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{ModuleError, Res, remux::DEFAULT_FFMPEG, soundcloud::ApiBackend};

pub const ENV_ACCESS_TOKEN: &str = "SOUNDCLOUD_ACCESS_TOKEN";
pub const ENV_IGNORE_ALBUM_TRACKS: &str = "SOUNDCLOUD_IGNORE_ALBUM_TRACKS";
pub const ENV_API: &str = "SOUNDCLOUD_API";
pub const ENV_API_BASE: &str = "SOUNDCLOUD_API_BASE";
pub const ENV_FFMPEG: &str = "SOUNDCLOUD_FFMPEG";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables from
/// `soundcloud-module/.env` under the platform-specific local data directory:
/// - Linux: `~/.local/share/soundcloud-module/.env`
/// - macOS: `~/Library/Application Support/soundcloud-module/.env`
/// - Windows: `%LOCALAPPDATA%/soundcloud-module/.env`
///
/// A missing file is not an error; the settings may come from the process
/// environment alone.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ModuleError::Config(e.to_string()))?;
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("soundcloud-module/.env");
    path
}

/// Settings the host hands to the module at construction.
#[derive(Debug, Clone)]
pub struct ModuleSettings {
    /// OAuth token sent as `Authorization: OAuth <token>`.
    pub access_token: String,
    /// Skip tracks of an artist download that were already fetched as part of
    /// one of the artist's albums.
    pub artist_download_ignore_tracks_in_albums: bool,
    pub backend: ApiBackend,
    /// Overrides the backend's base URL, mostly useful against a mock server.
    pub api_base: Option<String>,
    /// Program used to repair AAC containers.
    pub ffmpeg_path: String,
}

impl ModuleSettings {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            artist_download_ignore_tracks_in_albums: true,
            backend: ApiBackend::Mobile,
            api_base: None,
            ffmpeg_path: DEFAULT_FFMPEG.to_string(),
        }
    }

    pub fn with_backend(mut self, backend: ApiBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_ffmpeg(mut self, ffmpeg_path: impl Into<String>) -> Self {
        self.ffmpeg_path = ffmpeg_path.into();
        self
    }

    pub fn with_dedup(mut self, enabled: bool) -> Self {
        self.artist_download_ignore_tracks_in_albums = enabled;
        self
    }

    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `SOUNDCLOUD_ACCESS_TOKEN` is unset or when `SOUNDCLOUD_API` or
    /// `SOUNDCLOUD_IGNORE_ALBUM_TRACKS` hold values that cannot be parsed.
    pub fn from_env() -> Res<Self> {
        let access_token = env::var(ENV_ACCESS_TOKEN)
            .map_err(|_| ModuleError::Config(format!("{} must be set", ENV_ACCESS_TOKEN)))?;

        let mut settings = Self::new(access_token);

        if let Ok(value) = env::var(ENV_IGNORE_ALBUM_TRACKS) {
            settings.artist_download_ignore_tracks_in_albums = parse_bool(&value).ok_or_else(
                || ModuleError::Config(format!("{} must be true or false", ENV_IGNORE_ALBUM_TRACKS)),
            )?;
        }

        if let Ok(value) = env::var(ENV_API) {
            settings.backend = value.parse()?;
        }

        if let Ok(value) = env::var(ENV_API_BASE) {
            if !value.trim().is_empty() {
                settings.api_base = Some(value);
            }
        }

        if let Ok(value) = env::var(ENV_FFMPEG) {
            if !value.trim().is_empty() {
                settings.ffmpeg_path = value;
            }
        }

        Ok(settings)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
