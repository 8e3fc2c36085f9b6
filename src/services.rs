// src/services.rs

//! Composition root. Builds the service graph once from [`Settings`] and hands
//! out references; nothing in the crate reaches for a global.

use crate::constants::INSTALL_LEDGER_FILENAME;
use crate::core::cache::CacheStore;
use crate::core::enrichment::EnrichmentResolver;
use crate::core::install_ledger::InstallLedger;
use crate::core::installer::Installer;
use crate::core::local_repository::LocalRepository;
use crate::core::paths::{InstallRoots, PathError};
use crate::core::remote_repository::RemoteRepository;
use crate::system::http::{HttpClient, ReqwestHttpClient};
use crate::system::prompt::{Confirm, TerminalConfirm};
use crate::system::settings::{Settings, SettingsError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServicesError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to initialize the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Services {
    settings: Settings,
    cache_dir: PathBuf,
    remote: Arc<RemoteRepository>,
    local: Arc<LocalRepository>,
    installer: Installer,
}

impl Services {
    /// Wires the production graph: `reqwest` transport, terminal prompt, and
    /// install roots under the home and current directories.
    pub fn new(settings: Settings) -> Result<Self, ServicesError> {
        let http = Arc::new(ReqwestHttpClient::new(settings.request_timeout())?);
        let cache_dir = settings.resolve_cache_dir()?;
        let roots = InstallRoots::detect()?;
        Ok(Self::from_parts(
            settings,
            http,
            roots,
            cache_dir,
            Arc::new(TerminalConfirm),
        ))
    }

    /// Wires the graph from explicit collaborators.
    pub fn from_parts(
        settings: Settings,
        http: Arc<dyn HttpClient>,
        roots: InstallRoots,
        cache_dir: PathBuf,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let cache = CacheStore::new(&cache_dir, settings.cache_ttl());
        let remote = Arc::new(RemoteRepository::new(settings.base_url.clone(), http, cache));
        let local = Arc::new(LocalRepository::new(
            roots.personal.clone(),
            roots.project.clone(),
        ));
        let ledger = InstallLedger::new(cache_dir.join(INSTALL_LEDGER_FILENAME));
        let installer = Installer::new(remote.clone(), roots, ledger, confirm);

        Self {
            settings,
            cache_dir,
            remote,
            local,
            installer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    pub fn remote(&self) -> &RemoteRepository {
        &self.remote
    }

    pub fn local(&self) -> &LocalRepository {
        &self.local
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    /// A resolver for `language`, or the configured language when `None`.
    pub fn resolver(&self, language: Option<&str>) -> EnrichmentResolver {
        let language = language.unwrap_or(&self.settings.language);
        EnrichmentResolver::new(self.remote.clone(), self.local.clone(), language)
    }

    pub fn language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.settings.language)
    }
}
