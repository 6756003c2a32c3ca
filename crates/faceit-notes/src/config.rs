//! Configuration management for faceit-notes.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "faceit-notes";

/// Default notes document file name.
const NOTES_FILE_NAME: &str = "database.json";

/// Default notes database file name (sqlite backend).
const NOTES_DB_FILE_NAME: &str = "notes.db";

/// Default session snapshot file name.
const SNAPSHOT_FILE_NAME: &str = "match.json";

/// Default avatar thumbnail directory name.
const AVATAR_DIR_NAME: &str = "avatars";

/// Public Faceit Data API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.faceit.com/data/v4";

/// Image shown for players without an avatar.
pub const DEFAULT_PLACEHOLDER_AVATAR: &str = "https://www.ledr.com/colours/black.jpg";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. The bare `API_KEY` environment variable (for `api.api_key` only)
/// 2. Environment variables prefixed with `FACEIT_NOTES_`, nested with `__`
///    (e.g. `FACEIT_NOTES_API__MATCH_TIMEOUT_SECS=20`)
/// 3. TOML config file at `~/.config/faceit-notes/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API configuration.
    pub api: ApiConfig,
    /// Local storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Faceit Data API configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Data API, without a trailing slash.
    pub base_url: String,
    /// Server-side API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Timeout for the match lookup in seconds.
    pub match_timeout_secs: u64,
    /// Timeout for each avatar download in seconds.
    pub avatar_timeout_secs: u64,
}

/// Which backend holds the player notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteBackend {
    /// A single JSON document mapping player id to note.
    #[default]
    Json,
    /// An embedded `SQLite` database with one row per player.
    Sqlite,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding all local files.
    /// Defaults to `~/.local/share/faceit-notes`
    pub data_dir: Option<PathBuf>,
    /// Path to the notes file. Defaults depend on the backend.
    pub notes_path: Option<PathBuf>,
    /// Path to the last-search snapshot.
    pub snapshot_path: Option<PathBuf>,
    /// Notes backend.
    pub backend: NoteBackend,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Avatar reference used when a player has none.
    pub placeholder_avatar: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            match_timeout_secs: 10,
            avatar_timeout_secs: 5,
        }
    }
}

// Hand-written so the key never ends up in logs or `config show`.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("match_timeout_secs", &self.match_timeout_secs)
            .field("avatar_timeout_secs", &self.avatar_timeout_secs)
            .finish()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder_avatar: DEFAULT_PLACEHOLDER_AVATAR.to_string(),
        }
    }
}

impl ApiConfig {
    /// The configured API key, if any non-blank one is set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Get the match lookup timeout as a Duration.
    #[must_use]
    pub fn match_timeout(&self) -> Duration {
        Duration::from_secs(self.match_timeout_secs)
    }

    /// Get the avatar download timeout as a Duration.
    #[must_use]
    pub fn avatar_timeout(&self) -> Duration {
        Duration::from_secs(self.avatar_timeout_secs)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack behind [`Config::load_from`].
    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("FACEIT_NOTES_").split("__"))
            .merge(
                Env::raw()
                    .only(&["API_KEY"])
                    .map(|_| "api.api_key".into()),
            )
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::invalid_config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        if self.api.match_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "match_timeout_secs must be greater than 0",
            ));
        }

        if self.api.avatar_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "avatar_timeout_secs must be greater than 0",
            ));
        }

        if self.display.placeholder_avatar.trim().is_empty() {
            return Err(Error::invalid_config("placeholder_avatar must not be empty"));
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the notes path, resolving defaults for the configured backend.
    #[must_use]
    pub fn notes_path(&self) -> PathBuf {
        self.storage.notes_path.clone().unwrap_or_else(|| {
            let file_name = match self.storage.backend {
                NoteBackend::Json => NOTES_FILE_NAME,
                NoteBackend::Sqlite => NOTES_DB_FILE_NAME,
            };
            self.data_dir().join(file_name)
        })
    }

    /// Get the snapshot path, resolving defaults if not set.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.storage
            .snapshot_path
            .clone()
            .unwrap_or_else(|| self.data_dir().join(SNAPSHOT_FILE_NAME))
    }

    /// Directory for downloaded avatar thumbnails.
    #[must_use]
    pub fn avatar_dir(&self) -> PathBuf {
        self.data_dir().join(AVATAR_DIR_NAME)
    }
}
