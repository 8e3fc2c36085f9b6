// src/core/enrichment.rs

//! # Enrichment Resolver
//!
//! Merges what the repository and the two install roots know about a command
//! into one [`EnrichedCommand`].
//!
//! Precedence for the effective command is personal, then project, then the
//! repository. A local copy therefore shadows upstream; drift is reported
//! through `InstallationStatus::has_local_changes`.

use crate::core::cache::FetchOptions;
use crate::core::local_repository::{LocalCommand, LocalRepository};
use crate::core::namespace;
use crate::core::repository::{CommandRepository, RepositoryError, RepositoryResult};
use crate::models::{
    Command, CommandSource, EnrichedCommand, InstallLocation, InstallationStatus,
};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// True when the local copy differs from upstream in description, tools or hint.
pub fn has_local_changes(local: &Command, upstream: &Command) -> bool {
    local.description != upstream.description
        || local.allowed_tools != upstream.allowed_tools
        || local.argument_hint != upstream.argument_hint
}

#[derive(Debug, Clone)]
pub struct EnrichmentResolver {
    remote: Arc<dyn CommandRepository>,
    local: Arc<LocalRepository>,
    language: String,
}

impl EnrichmentResolver {
    pub fn new(
        remote: Arc<dyn CommandRepository>,
        local: Arc<LocalRepository>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            local,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    async fn find_remote(&self, name: &str) -> RepositoryResult<Option<Command>> {
        let manifest = match self
            .remote
            .get_manifest(&self.language, FetchOptions::default())
            .await
        {
            Ok(manifest) => manifest,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let wanted = namespace::normalize(name);
        Ok(manifest
            .commands
            .into_iter()
            .find(|c| namespace::normalize(&c.name) == wanted))
    }

    fn merge(
        &self,
        name: &str,
        remote: Option<Command>,
        personal: Option<LocalCommand>,
        project: Option<LocalCommand>,
    ) -> RepositoryResult<EnrichedCommand> {
        let mut available_in_sources = BTreeSet::new();
        if remote.is_some() {
            available_in_sources.insert(CommandSource::Repository);
        }
        if personal.is_some() {
            available_in_sources.insert(CommandSource::Personal);
        }
        if project.is_some() {
            available_in_sources.insert(CommandSource::Project);
        }

        let effective_local = personal.or(project);

        let installation_status = remote.as_ref().map(|upstream| match &effective_local {
            Some(local) => InstallationStatus {
                is_installed: true,
                install_location: Some(local.location),
                install_path: Some(local.path.clone()),
                has_local_changes: has_local_changes(&local.command, upstream),
            },
            None => InstallationStatus {
                is_installed: false,
                install_location: None,
                install_path: None,
                has_local_changes: false,
            },
        });

        let (command, source) = match (effective_local, remote) {
            (Some(local), _) => (local.command, CommandSource::from(local.location)),
            (None, Some(upstream)) => (upstream, CommandSource::Repository),
            (None, None) => {
                return Err(RepositoryError::CommandNotFound {
                    name: name.to_string(),
                    lang: self.language.clone(),
                });
            }
        };

        Ok(EnrichedCommand {
            command,
            source,
            available_in_sources,
            installation_status,
        })
    }

    /// Resolves one command across every source.
    ///
    /// # Errors
    /// `RepositoryError::CommandNotFound` if no source knows `name`. Other
    /// repository errors propagate.
    pub async fn get_enhanced_command_info(&self, name: &str) -> RepositoryResult<EnrichedCommand> {
        let remote = self.find_remote(name).await?;
        let personal = self.local.find_in(name, InstallLocation::Personal);
        let project = self.local.find_in(name, InstallLocation::Project);
        debug!(
            "Resolving '{}': repository={}, personal={}, project={}",
            name,
            remote.is_some(),
            personal.is_some(),
            project.is_some()
        );

        self.merge(name, remote, personal, project)
    }

    /// Resolves every command known to any source, sorted by name.
    ///
    /// # Errors
    /// Propagates repository errors; local scanning never fails.
    pub async fn list_enhanced_commands(
        &self,
        options: FetchOptions,
    ) -> RepositoryResult<Vec<EnrichedCommand>> {
        let manifest = self.remote.get_manifest(&self.language, options).await?;
        let personal = self.local.scan_location(InstallLocation::Personal);
        let project = self.local.scan_location(InstallLocation::Project);

        type Slot = (Option<Command>, Option<LocalCommand>, Option<LocalCommand>);
        let mut by_name: BTreeMap<String, Slot> = BTreeMap::new();
        for command in manifest.commands {
            let slot = by_name.entry(namespace::normalize(&command.name)).or_default();
            if slot.0.is_none() {
                slot.0 = Some(command);
            }
        }
        for local in personal {
            let slot = by_name.entry(namespace::normalize(&local.command.name)).or_default();
            if slot.1.is_none() {
                slot.1 = Some(local);
            }
        }
        for local in project {
            let slot = by_name.entry(namespace::normalize(&local.command.name)).or_default();
            if slot.2.is_none() {
                slot.2 = Some(local);
            }
        }

        by_name
            .into_iter()
            .map(|(name, (remote, personal, project))| {
                self.merge(&name, remote, personal, project)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::CacheStore;
    use crate::core::remote_repository::RemoteRepository;
    use crate::system::http::testing::{StubHttpClient, StubReply};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const BASE: &str = "https://example.test";

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    struct Fixture {
        dir: TempDir,
        stub: Arc<StubHttpClient>,
    }

    impl Fixture {
        fn new() -> Self {
            let stub = Arc::new(StubHttpClient::new());
            stub.body(
                &format!("{}/commands/en/manifest.json", BASE),
                &serde_json::json!({
                    "version": "1.0.0",
                    "updated": "2025-01-01T00:00:00Z",
                    "commands": [
                        {"name": "review", "description": "Review code",
                         "file": "review.md", "allowed-tools": "Read, Grep"},
                        {"name": "git:commit", "description": "Commit",
                         "file": "git/commit.md", "allowed-tools": ["Bash"]}
                    ]
                })
                .to_string(),
            );
            Self {
                dir: TempDir::new().unwrap(),
                stub,
            }
        }

        fn personal(&self) -> std::path::PathBuf {
            self.dir.path().join("personal")
        }

        fn project(&self) -> std::path::PathBuf {
            self.dir.path().join("project")
        }

        fn resolver(&self) -> EnrichmentResolver {
            let cache = CacheStore::new(self.dir.path().join("cache"), Duration::from_secs(60));
            let remote = RemoteRepository::new(BASE, self.stub.clone(), cache);
            let local = LocalRepository::new(self.personal(), self.project());
            EnrichmentResolver::new(Arc::new(remote), Arc::new(local), "en")
        }
    }

    #[tokio::test]
    async fn test_personal_beats_project_and_repository() {
        let fx = Fixture::new();
        write(
            &fx.personal(),
            "review.md",
            "---\ndescription: My review\nallowed-tools: Grep, Read\n---\n",
        );
        write(
            &fx.project(),
            "review.md",
            "---\ndescription: Team review\n---\n",
        );

        let enriched = fx.resolver().get_enhanced_command_info("review").await.unwrap();

        assert_eq!(enriched.source, CommandSource::Personal);
        assert_eq!(enriched.command.description, "My review");
        assert_eq!(
            enriched.available_in_sources,
            BTreeSet::from([
                CommandSource::Repository,
                CommandSource::Personal,
                CommandSource::Project,
            ])
        );
        let status = enriched.installation_status.unwrap();
        assert!(status.is_installed);
        assert_eq!(status.install_location, Some(InstallLocation::Personal));
        assert!(status.has_local_changes);
    }

    #[tokio::test]
    async fn test_repository_only_command() {
        let fx = Fixture::new();
        let enriched = fx
            .resolver()
            .get_enhanced_command_info("git/commit")
            .await
            .unwrap();

        assert_eq!(enriched.source, CommandSource::Repository);
        assert_eq!(enriched.command.name, "git:commit");
        let status = enriched.installation_status.unwrap();
        assert!(!status.is_installed);
        assert!(status.install_path.is_none());
    }

    #[tokio::test]
    async fn test_unchanged_local_copy_has_no_local_changes() {
        let fx = Fixture::new();
        // Same tool set written in a different order and shape.
        write(
            &fx.project(),
            "git/commit.md",
            "---\ndescription: Commit\nallowed-tools: [Bash]\n---\n",
        );

        let enriched = fx
            .resolver()
            .get_enhanced_command_info("git:commit")
            .await
            .unwrap();
        assert_eq!(enriched.source, CommandSource::Project);
        assert!(!enriched.installation_status.unwrap().has_local_changes);
    }

    #[tokio::test]
    async fn test_local_only_command_has_no_installation_status() {
        let fx = Fixture::new();
        write(&fx.personal(), "scratch.md", "# Scratch pad\n");

        let enriched = fx.resolver().get_enhanced_command_info("scratch").await.unwrap();
        assert_eq!(enriched.source, CommandSource::Personal);
        assert!(enriched.installation_status.is_none());
        assert_eq!(
            enriched.available_in_sources,
            BTreeSet::from([CommandSource::Personal])
        );
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found() {
        let fx = Fixture::new();
        let result = fx.resolver().get_enhanced_command_info("ghost").await;
        match result {
            Err(RepositoryError::CommandNotFound { name, lang }) => {
                assert_eq!(name, "ghost");
                assert_eq!(lang, "en");
            }
            other => panic!("Expected CommandNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let fx = Fixture::new();
        fx.stub.reply(
            &format!("{}/commands/en/manifest.json", BASE),
            StubReply::Timeout,
        );
        write(&fx.personal(), "review.md", "# Local review\n");

        let result = fx.resolver().get_enhanced_command_info("review").await;
        assert!(matches!(result, Err(RepositoryError::Manifest { .. })));
    }

    #[tokio::test]
    async fn test_list_merges_all_sources() {
        let fx = Fixture::new();
        write(&fx.personal(), "scratch.md", "# Scratch\n");
        write(&fx.project(), "review.md", "---\ndescription: Review code\nallowed-tools: Read, Grep\n---\n");

        let listed = fx
            .resolver()
            .list_enhanced_commands(FetchOptions::default())
            .await
            .unwrap();
        let names: Vec<(&str, CommandSource)> = listed
            .iter()
            .map(|e| (e.command.name.as_str(), e.source))
            .collect();
        assert_eq!(
            names,
            vec![
                ("git:commit", CommandSource::Repository),
                ("review", CommandSource::Project),
                ("scratch", CommandSource::Personal),
            ]
        );
        let review = &listed[1];
        assert!(!review.installation_status.as_ref().unwrap().has_local_changes);
    }
}
