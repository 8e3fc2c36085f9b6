// src/core/installer.rs

//! # Installation Manager
//!
//! Owns every filesystem mutation of the install roots. Destination paths are
//! built by [`build_command_path`], which rejects any name that would land
//! outside its base directory before anything is written.

use crate::constants::COMMAND_FILE_EXTENSION;
use crate::core::cache::{FetchOptions, content_digest};
use crate::core::command_parser::{self, ParseError};
use crate::core::install_ledger::InstallLedger;
use crate::core::local_repository::derive_identity;
use crate::core::namespace;
use crate::core::paths::InstallRoots;
use crate::core::repository::{CommandRepository, RepositoryError};
use crate::models::{
    DirectoryDescriptor, InstallLocation, InstallationRecord, InstallationSummary, RecordSource,
};
use crate::system::prompt::Confirm;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Command '{name}' is already installed at '{path}'. Use --force to overwrite it.")]
    CommandExists { name: String, path: PathBuf },
    #[error("Command '{name}' is not installed in any commands directory.")]
    CommandNotInstalled { name: String },
    /// The name would place a file outside its base directory.
    #[error("Refusing command name '{name}': {reason} (base directory '{base}').")]
    PathEscape {
        name: String,
        base: PathBuf,
        reason: String,
    },
    #[error("Content of command '{name}' is not a valid command file: {source}")]
    InvalidCommandFile {
        name: String,
        #[source]
        source: ParseError,
    },
    #[error("Failed to {operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

type InstallResult<T> = Result<T, InstallError>;

fn io_error<'a>(
    operation: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> InstallError + 'a {
    move |source| InstallError::Io {
        operation,
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub target: InstallLocation,
    pub force: bool,
    pub language: String,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            target: InstallLocation::Personal,
            force: false,
            language: crate::constants::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Skip the confirmation prompt.
    pub yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed {
        location: InstallLocation,
        path: PathBuf,
    },
    /// The user declined the confirmation prompt.
    Cancelled,
}

/// Canonicalizes the deepest existing ancestor of `path` and re-appends the
/// components that do not exist yet.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut pending: Vec<OsString> = Vec::new();

    loop {
        if let Ok(mut resolved) = dunce::canonicalize(existing) {
            for component in pending.iter().rev() {
                resolved.push(component);
            }
            return Ok(resolved);
        }
        let (Some(name), Some(parent)) = (existing.file_name(), existing.parent()) else {
            return Ok(absolute);
        };
        pending.push(name.to_os_string());
        existing = parent;
    }
}

/// Maps `name` to `{base}/{namespace dirs}/{leaf}.md`.
///
/// `name` is split on `:`, `/` and `\`. Absolute names and `.`/`..` segments
/// are rejected, and the result (with symlinks resolved) must still be inside
/// `base`.
///
/// # Errors
/// `InstallError::PathEscape` for any name that would leave `base`.
pub fn build_command_path(name: &str, base: &Path) -> InstallResult<PathBuf> {
    let escape = |reason: &str| InstallError::PathEscape {
        name: name.to_string(),
        base: base.to_path_buf(),
        reason: reason.to_string(),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(escape("the name is empty"));
    }
    if trimmed.starts_with(['/', '\\']) || Path::new(trimmed).is_absolute() {
        return Err(escape("the name is an absolute path"));
    }

    let segments: Vec<&str> = trimmed
        .split([namespace::COLON_SEPARATOR, namespace::PATH_SEPARATOR, '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.iter().any(|s| *s == ".." || *s == ".") {
        return Err(escape("the name contains a '.' or '..' segment"));
    }
    if segments.iter().any(|s| s.contains('\0')) {
        return Err(escape("the name contains a NUL byte"));
    }
    let Some((leaf, dirs)) = segments.split_last() else {
        return Err(escape("the name has no segments"));
    };

    let mut relative: PathBuf = dirs.iter().collect();
    relative.push(format!("{}.{}", leaf, COMMAND_FILE_EXTENSION));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(escape("the name does not map to a relative path"));
    }

    let resolved_base = resolve(base).map_err(io_error("resolve", base))?;
    let candidate = resolved_base.join(&relative);
    let resolved = resolve(&candidate).map_err(io_error("resolve", &candidate))?;
    if !resolved.starts_with(&resolved_base) {
        return Err(escape("the path resolves outside the base directory"));
    }
    Ok(resolved)
}

fn modified_at(metadata: &fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Installs, removes and inspects command files under the install roots.
#[derive(Debug, Clone)]
pub struct Installer {
    repository: Arc<dyn CommandRepository>,
    roots: InstallRoots,
    ledger: InstallLedger,
    confirm: Arc<dyn Confirm>,
}

impl Installer {
    pub fn new(
        repository: Arc<dyn CommandRepository>,
        roots: InstallRoots,
        ledger: InstallLedger,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            repository,
            roots,
            ledger,
            confirm,
        }
    }

    pub fn roots(&self) -> &InstallRoots {
        &self.roots
    }

    pub fn describe(&self, kind: InstallLocation) -> DirectoryDescriptor {
        self.roots.describe(kind)
    }

    /// Downloads `name` and writes it into the target root.
    ///
    /// # Errors
    /// Path escapes and existing files are reported before anything is
    /// fetched. Repository failures, invalid content and I/O failures follow.
    pub async fn install_command(
        &self,
        name: &str,
        options: &InstallOptions,
    ) -> InstallResult<InstallationRecord> {
        let base = self.roots.get(options.target);
        let path = build_command_path(name, base)?;

        if path.exists() && !options.force {
            return Err(InstallError::CommandExists {
                name: name.to_string(),
                path,
            });
        }

        let content = self
            .repository
            .get_command(name, &options.language, FetchOptions::default())
            .await?;
        command_parser::validate(&content).map_err(|source| InstallError::InvalidCommandFile {
            name: name.to_string(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
        }
        fs::write(&path, &content).map_err(io_error("write", &path))?;
        info!("Installed '{}' to '{}'", name, path.display());

        let provenance_version = match self
            .repository
            .get_manifest(&options.language, FetchOptions::default())
            .await
        {
            Ok(manifest) => Some(manifest.version),
            Err(e) => {
                debug!("No manifest version for '{}': {}", name, e);
                None
            }
        };

        let record = InstallationRecord {
            name: namespace::normalize(name),
            file_path: path,
            location: options.target,
            installed_at: Utc::now(),
            size_bytes: u64::try_from(content.len()).unwrap_or(u64::MAX),
            source: RecordSource::Repository,
            provenance_version,
            content_hash: Some(content_digest(content.as_bytes())),
        };
        if let Err(e) = self.ledger.record(record.clone()) {
            warn!("Failed to update installation ledger: {}", e);
        }
        Ok(record)
    }

    /// Finds the installed file for `name`, searching personal then project.
    fn locate(&self, name: &str) -> InstallResult<Option<(InstallLocation, PathBuf)>> {
        for location in InstallLocation::SEARCH_ORDER {
            let path = build_command_path(name, self.roots.get(location))?;
            if path.is_file() {
                return Ok(Some((location, path)));
            }
        }
        Ok(None)
    }

    pub fn is_installed(&self, name: &str) -> InstallResult<bool> {
        Ok(self.locate(name)?.is_some())
    }

    pub fn get_installation_path(&self, name: &str) -> InstallResult<Option<PathBuf>> {
        Ok(self.locate(name)?.map(|(_, path)| path))
    }

    /// Removes the installed file for `name`, asking first unless `options.yes`.
    ///
    /// # Errors
    /// `InstallError::CommandNotInstalled` when no root holds the command.
    pub fn remove_command(&self, name: &str, options: RemoveOptions) -> InstallResult<RemoveOutcome> {
        let Some((location, path)) = self.locate(name)? else {
            return Err(InstallError::CommandNotInstalled {
                name: name.to_string(),
            });
        };

        if !options.yes {
            let message = format!("Remove command '{}' from '{}'?", name, path.display());
            let accepted = self
                .confirm
                .confirm(&message)
                .map_err(io_error("confirm removal of", &path))?;
            if !accepted {
                debug!("Removal of '{}' cancelled", name);
                return Ok(RemoveOutcome::Cancelled);
            }
        }

        fs::remove_file(&path).map_err(io_error("remove", &path))?;
        self.prune_empty_dirs(&path, self.roots.get(location));
        info!("Removed '{}' from '{}'", name, path.display());

        if let Err(e) = self.ledger.forget(&namespace::normalize(name), location) {
            warn!("Failed to update installation ledger: {}", e);
        }
        Ok(RemoveOutcome::Removed { location, path })
    }

    /// Removes namespace directories left empty by a removal, stopping at the root.
    fn prune_empty_dirs(&self, removed: &Path, root: &Path) {
        let Ok(root) = resolve(root) else {
            return;
        };
        let mut current = removed.parent();
        while let Some(dir) = current {
            if dir == root || !dir.starts_with(&root) {
                break;
            }
            // Fails (and stops) on the first non-empty directory.
            if fs::remove_dir(dir).is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    fn derive_record(
        name: String,
        location: InstallLocation,
        path: PathBuf,
    ) -> InstallResult<InstallationRecord> {
        let metadata = fs::metadata(&path).map_err(io_error("inspect", &path))?;
        let content = fs::read(&path).map_err(io_error("read", &path))?;
        Ok(InstallationRecord {
            name,
            installed_at: modified_at(&metadata),
            size_bytes: metadata.len(),
            file_path: path,
            location,
            source: RecordSource::Local,
            provenance_version: None,
            content_hash: Some(content_digest(&content)),
        })
    }

    fn ledger_records(&self) -> Vec<InstallationRecord> {
        self.ledger.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable installation ledger: {}", e);
            Vec::new()
        })
    }

    fn record_for(
        records: &[InstallationRecord],
        name: String,
        location: InstallLocation,
        path: PathBuf,
    ) -> InstallResult<InstallationRecord> {
        match records
            .iter()
            .find(|r| r.name == name && r.location == location && r.file_path == path)
        {
            Some(record) => Ok(record.clone()),
            None => Self::derive_record(name, location, path),
        }
    }

    /// Describes the installed copy of `name`. Prefers the ledger record and
    /// falls back to one derived from the file itself.
    pub fn get_installation_info(&self, name: &str) -> InstallResult<Option<InstallationRecord>> {
        let Some((location, path)) = self.locate(name)? else {
            return Ok(None);
        };
        let records = self.ledger_records();
        Self::record_for(&records, namespace::normalize(name), location, path).map(Some)
    }

    /// Lists every installed command in both roots.
    pub fn get_all_installation_info(&self) -> InstallResult<Vec<InstallationRecord>> {
        let records = self.ledger_records();
        let mut all = Vec::new();

        for location in InstallLocation::SEARCH_ORDER {
            let root = self.roots.get(location);
            if !root.is_dir() {
                continue;
            }
            let Ok(resolved_root) = resolve(root) else {
                continue;
            };

            let entries = WalkDir::new(&resolved_root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !is_hidden(e))
                .filter_map(|e| match e {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        warn!("Skipping unreadable entry: {}", err);
                        None
                    }
                });

            for entry in entries {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some(COMMAND_FILE_EXTENSION)
                {
                    continue;
                }
                let Some((name, _, _)) = path
                    .strip_prefix(&resolved_root)
                    .ok()
                    .and_then(derive_identity)
                else {
                    continue;
                };
                match Self::record_for(&records, name, location, path.to_path_buf()) {
                    Ok(record) => all.push(record),
                    Err(e) => warn!("Skipping installed command: {}", e),
                }
            }
        }
        Ok(all)
    }

    pub fn get_installation_summary(&self) -> InstallResult<InstallationSummary> {
        let mut summary = InstallationSummary::default();
        for record in self.get_all_installation_info()? {
            match record.location {
                InstallLocation::Personal => summary.personal.push(record.name),
                InstallLocation::Project => summary.project.push(record.name),
            }
        }
        summary.total = summary.personal.len() + summary.project.len();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::CacheStore;
    use crate::core::remote_repository::RemoteRepository;
    use crate::system::http::testing::StubHttpClient;
    use crate::system::prompt::FixedAnswer;
    use std::time::Duration;
    use tempfile::TempDir;

    const BASE: &str = "https://example.test";
    const COMPONENT: &str = "---\ndescription: Scaffold a component\nallowed-tools: Write\n---\nBody\n";

    struct Fixture {
        dir: TempDir,
        stub: Arc<StubHttpClient>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let stub = Arc::new(StubHttpClient::new());
            stub.body(
                &format!("{}/commands/en/manifest.json", BASE),
                &serde_json::json!({
                    "version": "2.0.0",
                    "updated": "2025-01-01T00:00:00Z",
                    "commands": [
                        {"name": "frontend:component", "description": "Scaffold a component",
                         "file": "frontend/component.md", "allowed-tools": ["Write"]},
                        {"name": "broken", "description": "Bad file",
                         "file": "broken.md", "allowed-tools": "Read"},
                        {"name": "../evil", "description": "Escape",
                         "file": "evil.md", "allowed-tools": "Read"}
                    ]
                })
                .to_string(),
            );
            stub.body(&format!("{}/commands/en/frontend/component.md", BASE), COMPONENT);
            stub.body(&format!("{}/commands/en/broken.md", BASE), "---\nnever closed\n");
            stub.body(&format!("{}/commands/en/evil.md", BASE), COMPONENT);
            Self { dir, stub }
        }

        fn root(&self, location: InstallLocation) -> PathBuf {
            self.dir.path().join(location.as_str()).join(".claude/commands")
        }

        fn installer(&self, answer: bool) -> Installer {
            let cache = CacheStore::new(self.dir.path().join("cache"), Duration::from_secs(60));
            let repository = RemoteRepository::new(BASE, self.stub.clone(), cache);
            Installer::new(
                Arc::new(repository),
                InstallRoots::new(
                    self.root(InstallLocation::Personal),
                    self.root(InstallLocation::Project),
                ),
                InstallLedger::new(self.dir.path().join("cache/installations.bin")),
                Arc::new(FixedAnswer(answer)),
            )
        }
    }

    fn project() -> InstallOptions {
        InstallOptions {
            target: InstallLocation::Project,
            ..InstallOptions::default()
        }
    }

    #[test]
    fn test_build_command_path_maps_namespaces_to_dirs() {
        let dir = TempDir::new().unwrap();
        let base = dunce::canonicalize(dir.path()).unwrap();

        assert_eq!(
            build_command_path("frontend:component", &base).unwrap(),
            base.join("frontend").join("component.md")
        );
        assert_eq!(
            build_command_path("a/b/c", &base).unwrap(),
            base.join("a").join("b").join("c.md")
        );
        assert_eq!(build_command_path("commit", &base).unwrap(), base.join("commit.md"));
    }

    #[test]
    fn test_build_command_path_rejects_escapes() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("commands");

        for name in ["../evil", "..", "a/../../x", "a:..:b", "/etc/passwd", "\\evil", "", "  ", "./x"] {
            assert!(
                matches!(
                    build_command_path(name, &base),
                    Err(InstallError::PathEscape { .. })
                ),
                "'{}' should be rejected",
                name
            );
        }
        // Nothing was created while checking.
        assert!(!base.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_command_path_rejects_symlink_escape() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let base = dir.path().join("commands");
        fs::create_dir_all(&base).unwrap();
        std::os::unix::fs::symlink(outside.path(), base.join("link")).unwrap();

        assert!(matches!(
            build_command_path("link:payload", &base),
            Err(InstallError::PathEscape { .. })
        ));
    }

    #[tokio::test]
    async fn test_install_namespaced_command_into_empty_root() {
        let fx = Fixture::new();
        let installer = fx.installer(true);

        let record = installer
            .install_command("frontend:component", &InstallOptions::default())
            .await
            .unwrap();

        let expected = fx.root(InstallLocation::Personal).join("frontend/component.md");
        assert_eq!(fs::read_to_string(&expected).unwrap(), COMPONENT);
        assert_eq!(record.location, InstallLocation::Personal);
        assert_eq!(record.source, RecordSource::Repository);
        assert_eq!(record.provenance_version.as_deref(), Some("2.0.0"));
        assert_eq!(record.size_bytes, COMPONENT.len() as u64);
        assert!(installer.is_installed("frontend/component").unwrap());
    }

    #[tokio::test]
    async fn test_install_path_escape_writes_nothing() {
        let fx = Fixture::new();
        let installer = fx.installer(true);

        let result = installer
            .install_command("../evil", &InstallOptions::default())
            .await;

        assert!(matches!(result, Err(InstallError::PathEscape { .. })));
        assert!(!fx.root(InstallLocation::Personal).exists());
        assert!(!fx.dir.path().join("personal/.claude/evil.md").exists());
        // Rejected before any network access.
        assert!(fx.stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_install_existing_requires_force() {
        let fx = Fixture::new();
        let installer = fx.installer(true);
        installer
            .install_command("frontend:component", &project())
            .await
            .unwrap();

        let again = installer.install_command("frontend:component", &project()).await;
        assert!(matches!(again, Err(InstallError::CommandExists { .. })));

        let forced = InstallOptions {
            force: true,
            ..project()
        };
        assert!(installer.install_command("frontend:component", &forced).await.is_ok());
    }

    #[tokio::test]
    async fn test_install_rejects_invalid_content_and_missing_commands() {
        let fx = Fixture::new();
        let installer = fx.installer(true);

        let invalid = installer.install_command("broken", &InstallOptions::default()).await;
        assert!(matches!(invalid, Err(InstallError::InvalidCommandFile { .. })));
        assert!(!fx.root(InstallLocation::Personal).join("broken.md").exists());

        let missing = installer.install_command("nope", &InstallOptions::default()).await;
        match missing {
            Err(InstallError::Repository(e)) => assert!(e.is_not_found()),
            other => panic!("Expected a repository error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remove_flow() {
        let fx = Fixture::new();
        installer_with_component(&fx).await;

        // Declined: nothing happens.
        let declined = fx
            .installer(false)
            .remove_command("frontend:component", RemoveOptions::default())
            .unwrap();
        assert_eq!(declined, RemoveOutcome::Cancelled);
        let path = fx.root(InstallLocation::Project).join("frontend/component.md");
        assert!(path.exists());

        // Accepted: file removed and the empty namespace directory pruned.
        let outcome = fx
            .installer(true)
            .remove_command("frontend:component", RemoveOptions::default())
            .unwrap();
        assert!(matches!(
            outcome,
            RemoveOutcome::Removed {
                location: InstallLocation::Project,
                ..
            }
        ));
        assert!(!path.exists());
        assert!(!fx.root(InstallLocation::Project).join("frontend").exists());
        assert!(fx.root(InstallLocation::Project).exists());

        let again = fx
            .installer(false)
            .remove_command("frontend:component", RemoveOptions { yes: true });
        assert!(matches!(again, Err(InstallError::CommandNotInstalled { .. })));
    }

    async fn installer_with_component(fx: &Fixture) -> Installer {
        let installer = fx.installer(true);
        installer
            .install_command("frontend:component", &project())
            .await
            .unwrap();
        installer
    }

    #[tokio::test]
    async fn test_installation_info_prefers_ledger() {
        let fx = Fixture::new();
        let installer = installer_with_component(&fx).await;

        let info = installer
            .get_installation_info("frontend:component")
            .unwrap()
            .unwrap();
        assert_eq!(info.source, RecordSource::Repository);
        assert_eq!(info.provenance_version.as_deref(), Some("2.0.0"));
        assert_eq!(info.location, InstallLocation::Project);

        // A hand-placed file has a derived record.
        let manual = fx.root(InstallLocation::Personal).join("notes.md");
        fs::create_dir_all(manual.parent().unwrap()).unwrap();
        fs::write(&manual, "# Notes\n").unwrap();
        let derived = installer.get_installation_info("notes").unwrap().unwrap();
        assert_eq!(derived.source, RecordSource::Local);
        assert!(derived.provenance_version.is_none());
        assert_eq!(derived.size_bytes, 8);

        assert!(installer.get_installation_info("absent").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_and_listing() {
        let fx = Fixture::new();
        let installer = installer_with_component(&fx).await;
        let personal = fx.root(InstallLocation::Personal);
        fs::create_dir_all(personal.join(".hidden")).unwrap();
        fs::write(personal.join("commit.md"), "# Commit\n").unwrap();
        fs::write(personal.join(".hidden/secret.md"), "# Secret\n").unwrap();
        fs::write(personal.join("readme.txt"), "ignored").unwrap();

        let all = installer.get_all_installation_info().unwrap();
        assert_eq!(all.len(), 2);

        let summary = installer.get_installation_summary().unwrap();
        assert_eq!(summary.personal, vec!["commit"]);
        assert_eq!(summary.project, vec!["frontend:component"]);
        assert_eq!(summary.total, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_skipped_in_listing() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new();
        let installer = installer_with_component(&fx).await;
        let personal = fx.root(InstallLocation::Personal);
        fs::create_dir_all(&personal).unwrap();
        let locked = personal.join("locked.md");
        fs::write(&locked, "# Locked\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&locked).is_ok() {
            // Permissions are not enforced for this user (e.g. root).
            return;
        }

        let summary = installer.get_installation_summary().unwrap();
        assert!(summary.personal.is_empty());
        assert_eq!(summary.project, vec!["frontend:component"]);
        assert_eq!(summary.total, 1);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_queries_on_empty_roots() {
        let fx = Fixture::new();
        let installer = fx.installer(true);
        assert!(!installer.is_installed("commit").unwrap());
        assert!(installer.get_installation_path("commit").unwrap().is_none());
        assert_eq!(
            installer.get_installation_summary().unwrap(),
            InstallationSummary::default()
        );
        assert!(!installer.describe(InstallLocation::Personal).exists);
    }
}
