// src/core/local_repository.rs

//! # Local Repository
//!
//! Discovers commands already installed under the personal and project roots.
//! Each file is parsed independently; files that fail to parse are skipped
//! and reported in one log line per scan.

use crate::constants::{COMMAND_FILE_EXTENSION, LOCAL_MANIFEST_VERSION};
use crate::core::cache::FetchOptions;
use crate::core::command_parser;
use crate::core::namespace;
use crate::core::repository::{CommandRepository, RepositoryError, RepositoryResult};
use crate::models::{Command, InstallLocation, Manifest};
use crate::system::scanner;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A command found on disk, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCommand {
    pub command: Command,
    pub location: InstallLocation,
    pub path: PathBuf,
}

/// The result of one per-file parse attempt.
#[derive(Debug)]
pub enum ScanOutcome {
    Parsed(LocalCommand),
    Skipped { path: PathBuf, reason: String },
}

/// Derives `(name, namespace, file)` from a path relative to its root:
/// `frontend/react/hook.md` gives `frontend:react:hook`, `frontend:react`
/// and `frontend/react/hook.md`.
pub fn derive_identity(relative: &Path) -> Option<(String, Option<String>, String)> {
    let leaf = relative.file_stem()?.to_str()?.to_string();
    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let qualifier = (!dirs.is_empty()).then(|| dirs.join(&namespace::COLON_SEPARATOR.to_string()));
    let name = match &qualifier {
        Some(ns) => format!("{}{}{}", ns, namespace::COLON_SEPARATOR, leaf),
        None => leaf.clone(),
    };
    let mut file_segments = dirs;
    file_segments.push(format!("{}.{}", leaf, COMMAND_FILE_EXTENSION));
    let file = file_segments.join(&namespace::PATH_SEPARATOR.to_string());
    Some((name, qualifier, file))
}

/// Command source backed by the two install roots.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    personal: PathBuf,
    project: PathBuf,
}

impl LocalRepository {
    pub fn new(personal: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            personal: personal.into(),
            project: project.into(),
        }
    }

    pub fn root(&self, location: InstallLocation) -> &Path {
        match location {
            InstallLocation::Personal => &self.personal,
            InstallLocation::Project => &self.project,
        }
    }

    fn parse_file(root: &Path, path: PathBuf, location: InstallLocation) -> ScanOutcome {
        let skipped = |path: PathBuf, reason: String| ScanOutcome::Skipped { path, reason };

        let Some((name, namespace, file)) = path
            .strip_prefix(root)
            .ok()
            .and_then(derive_identity)
        else {
            return skipped(path, "file name is not valid UTF-8".to_string());
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return skipped(path, e.to_string()),
        };

        match command_parser::parse(&content) {
            Ok(parsed) => ScanOutcome::Parsed(LocalCommand {
                command: parsed.into_command(name, namespace, file),
                location,
                path,
            }),
            Err(e) => skipped(path, e.to_string()),
        }
    }

    /// Parses every command file under one root. A missing root yields an
    /// empty list.
    pub fn scan_location(&self, location: InstallLocation) -> Vec<LocalCommand> {
        let root = self.root(location);
        let files = match scanner::scan_files(root, COMMAND_FILE_EXTENSION) {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} commands directory at '{}'", location, root.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to scan '{}': {}", root.display(), e);
                return Vec::new();
            }
        };

        let outcomes: Vec<ScanOutcome> = files
            .into_iter()
            .map(|path| Self::parse_file(root, path, location))
            .collect();

        let mut commands = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                ScanOutcome::Parsed(command) => commands.push(command),
                ScanOutcome::Skipped { path, reason } => skipped.push((path, reason)),
            }
        }

        if !skipped.is_empty() {
            warn!(
                "Skipped {} unparsable command file(s) under '{}'",
                skipped.len(),
                root.display()
            );
            for (path, reason) in &skipped {
                debug!("  {}: {}", path.display(), reason);
            }
        }
        commands
    }

    /// Scans both roots concurrently and deduplicates by parsed name, keeping
    /// the personal copy when a name appears in both.
    pub fn scan(&self) -> Vec<LocalCommand> {
        let (personal, project) = rayon::join(
            || self.scan_location(InstallLocation::Personal),
            || self.scan_location(InstallLocation::Project),
        );

        let mut seen = HashSet::new();
        personal
            .into_iter()
            .chain(project)
            .filter(|local| seen.insert(namespace::normalize(&local.command.name)))
            .collect()
    }

    /// Looks a command up in one root.
    pub fn find_in(&self, name: &str, location: InstallLocation) -> Option<LocalCommand> {
        let wanted = namespace::normalize(name);
        self.scan_location(location)
            .into_iter()
            .find(|local| namespace::normalize(&local.command.name) == wanted)
    }

    /// Looks a command up in every root, in search order.
    pub fn find(&self, name: &str) -> Option<LocalCommand> {
        InstallLocation::SEARCH_ORDER
            .into_iter()
            .find_map(|location| self.find_in(name, location))
    }

    /// The deduplicated scan as a manifest.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            version: LOCAL_MANIFEST_VERSION.to_string(),
            updated: Utc::now().to_rfc3339(),
            commands: self.scan().into_iter().map(|local| local.command).collect(),
        }
    }
}

#[async_trait]
impl CommandRepository for LocalRepository {
    /// Local commands are not split by language; `lang` is ignored.
    async fn get_manifest(&self, _lang: &str, _options: FetchOptions) -> RepositoryResult<Manifest> {
        Ok(self.manifest())
    }

    async fn get_command(
        &self,
        name: &str,
        lang: &str,
        _options: FetchOptions,
    ) -> RepositoryResult<String> {
        let local = self
            .find(name)
            .ok_or_else(|| RepositoryError::CommandNotFound {
                name: name.to_string(),
                lang: lang.to_string(),
            })?;
        fs::read_to_string(&local.path).map_err(|source| RepositoryError::LocalContent {
            name: name.to_string(),
            path: local.path,
            source,
        })
    }
}
