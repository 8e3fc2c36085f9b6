// src/system/settings.rs

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_LANGUAGE, DEFAULT_REQUEST_TIMEOUT_MS,
};
use crate::core::paths::{self, PathError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid setting '{field}': {message}")]
    Invalid { field: &'static str, message: String },
    #[error(transparent)]
    Path(#[from] PathError),
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// User settings, read from `{config_dir}/claude-cmd/config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Overrides the cache location. `~` and `$VAR` are expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_ms: default_request_timeout_ms(),
            cache_dir: None,
        }
    }
}

impl Settings {
    /// Loads the settings from the default location, writing a default file
    /// the first time.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&paths::settings_path()?)
    }

    /// Loads the settings from `path`. A missing file yields the defaults and
    /// an attempt to write them out; failing to write is only logged.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.write_to(path) {
                warn!("Could not write default settings to '{}': {}", path.display(), e);
            } else {
                debug!("Wrote default settings to '{}'", path.display());
            }
            return Ok(settings);
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, toml_string)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SettingsError::Invalid {
                field: "base_url",
                message: format!("'{}' is not an http(s) URL", self.base_url),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "request_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The configured cache directory, or the platform default.
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.cache_dir {
            Some(template) => Ok(paths::expand_path_template(template)?),
            None => Ok(paths::default_cache_dir()?),
        }
    }
}
