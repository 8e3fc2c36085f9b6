// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CLAUDE_DIR, COMMANDS_DIR, SETTINGS_FILENAME};
use crate::models::{DirectoryDescriptor, InstallLocation};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not find system cache directory.")]
    CacheDirNotFound,
    #[error("Could not find home directory.")]
    HomeDirNotFound,
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("Failed to expand path template '{template}': {message}")]
    Expansion { template: String, message: String },
}

/// Returns `{config_dir}/claude-cmd`. Does not create it.
pub fn config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the path of the settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Returns the platform default cache directory, `{cache_dir}/claude-cmd`.
pub fn default_cache_dir() -> Result<PathBuf, PathError> {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(PathError::CacheDirNotFound)
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path template.
pub fn expand_path_template(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// `{home}/.claude/commands`
pub fn personal_commands_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir()
        .map(|home| home.join(CLAUDE_DIR).join(COMMANDS_DIR))
        .ok_or(PathError::HomeDirNotFound)
}

/// `{cwd}/.claude/commands`
pub fn project_commands_dir() -> Result<PathBuf, PathError> {
    std::env::current_dir()
        .map(|cwd| cwd.join(CLAUDE_DIR).join(COMMANDS_DIR))
        .map_err(PathError::CurrentDir)
}

/// The two install roots, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoots {
    pub personal: PathBuf,
    pub project: PathBuf,
}

impl InstallRoots {
    pub fn new(personal: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            personal: personal.into(),
            project: project.into(),
        }
    }

    /// Resolves the roots from the home and current directories.
    pub fn detect() -> Result<Self, PathError> {
        Ok(Self::new(personal_commands_dir()?, project_commands_dir()?))
    }

    pub fn get(&self, kind: InstallLocation) -> &Path {
        match kind {
            InstallLocation::Personal => &self.personal,
            InstallLocation::Project => &self.project,
        }
    }

    /// Probes one root. Always hits the filesystem.
    pub fn describe(&self, kind: InstallLocation) -> DirectoryDescriptor {
        describe_directory(self.get(kind), kind)
    }
}

/// Builds a fresh [`DirectoryDescriptor`] for `path`. A directory that does
/// not exist yet is writable when its nearest existing ancestor is.
pub fn describe_directory(path: &Path, kind: InstallLocation) -> DirectoryDescriptor {
    let exists = path.is_dir();
    let writable = path
        .ancestors()
        .find(|ancestor| ancestor.exists())
        .and_then(|ancestor| fs::metadata(ancestor).ok())
        .is_some_and(|meta| meta.is_dir() && !meta.permissions().readonly());

    DirectoryDescriptor {
        path: path.to_path_buf(),
        kind,
        exists,
        writable,
    }
}
