// src/core/remote_repository.rs

//! # Remote Repository
//!
//! Fetches manifests and command content over HTTP and routes every request
//! through the [`CacheStore`]. Transport failures are translated into
//! [`RepositoryError`] variants that keep the original cause.

use crate::constants::{
    COMMAND_CACHE_PREFIX, COMMAND_KEY_DIGEST_LEN, MANIFEST_CACHE_PREFIX, MANIFEST_FILENAME,
    REMOTE_COMMANDS_SEGMENT,
};
use crate::core::cache::{CacheKey, CacheStore, FetchOptions, content_digest};
use crate::core::repository::{CommandRepository, RepositoryError, RepositoryResult};
use crate::models::{CacheEntry, Manifest};
use crate::system::http::HttpClient;
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

lazy_static! {
    static ref LANGUAGE_RE: Regex = Regex::new(r"^[a-z]{2}$").expect("language pattern is valid");
    static ref MANIFEST_KEY_RE: Regex =
        Regex::new(r"^manifest-([a-z]{2})$").expect("manifest key pattern is valid");
}

/// Returns whether `lang` is a two-letter lowercase code.
pub fn is_valid_language(lang: &str) -> bool {
    LANGUAGE_RE.is_match(lang)
}

/// Checks the shape of a manifest payload: an object with a `commands` array
/// whose entries carry string `name`, `description` and `file`, and an
/// `allowed-tools` that is a string or an array of strings.
pub fn validate_manifest_value(value: &Value) -> Result<(), String> {
    let commands = value
        .get("commands")
        .and_then(Value::as_array)
        .ok_or_else(|| "payload is not an object with a 'commands' array".to_string())?;

    for (i, command) in commands.iter().enumerate() {
        for field in ["name", "description", "file"] {
            if !command.get(field).is_some_and(Value::is_string) {
                return Err(format!("command #{} has no string '{}'", i, field));
            }
        }
        let tools_ok = match command.get("allowed-tools") {
            Some(Value::String(_)) => true,
            Some(Value::Array(items)) => items.iter().all(Value::is_string),
            _ => false,
        };
        if !tools_ok {
            return Err(format!(
                "command #{} has an 'allowed-tools' that is neither a string nor a list of strings",
                i
            ));
        }
    }
    Ok(())
}

fn is_valid_manifest_value(value: &Value) -> bool {
    validate_manifest_value(value).is_ok()
}

/// Remote, cached command source.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    base_url: String,
    http: Arc<dyn HttpClient>,
    cache: CacheStore,
}

impl RemoteRepository {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>, cache: CacheStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            cache,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn manifest_url(&self, lang: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url, REMOTE_COMMANDS_SEGMENT, lang, MANIFEST_FILENAME
        )
    }

    fn content_url(&self, lang: &str, file: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            REMOTE_COMMANDS_SEGMENT,
            lang,
            file.trim_start_matches('/')
        )
    }

    fn ensure_language(lang: &str) -> RepositoryResult<()> {
        if is_valid_language(lang) {
            Ok(())
        } else {
            Err(RepositoryError::Manifest {
                lang: lang.to_string(),
                message: "language must be a two-letter lowercase code".to_string(),
                source: None,
            })
        }
    }

    fn manifest_key(lang: &str) -> RepositoryResult<CacheKey> {
        Ok(CacheKey::new([MANIFEST_CACHE_PREFIX, lang])?)
    }

    /// `command-{lang}-{name}-{digest}`. Sanitizing drops separators, so the
    /// digest of the raw name keeps `git:commit` and `gitcommit` apart.
    fn command_key(lang: &str, name: &str) -> RepositoryResult<CacheKey> {
        let digest = content_digest(name.as_bytes());
        let short = digest.get(..COMMAND_KEY_DIGEST_LEN).unwrap_or(digest.as_str());
        Ok(CacheKey::new([COMMAND_CACHE_PREFIX, lang, name, short])?)
    }

    async fn fetch_manifest(&self, lang: &str) -> RepositoryResult<Manifest> {
        let url = self.manifest_url(lang);
        let response = self
            .http
            .get(&url)
            .await
            .map_err(|e| RepositoryError::Manifest {
                lang: lang.to_string(),
                message: format!("failed to download '{}'", url),
                source: Some(e),
            })?;

        let malformed = |message: String| RepositoryError::Manifest {
            lang: lang.to_string(),
            message,
            source: None,
        };

        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| malformed(format!("manifest is not valid JSON: {}", e)))?;
        validate_manifest_value(&value).map_err(malformed)?;
        let manifest: Manifest = serde_json::from_value(value)
            .map_err(|e| malformed(format!("manifest has an unexpected shape: {}", e)))?;

        debug!(
            "Fetched manifest '{}' version '{}' with {} commands",
            lang,
            manifest.version,
            manifest.commands.len()
        );
        Ok(manifest)
    }

    /// Returns the cached manifest for `lang` regardless of its age, without
    /// touching the network.
    pub fn cached_manifest(&self, lang: &str) -> Option<CacheEntry<Manifest>> {
        let key = Self::manifest_key(lang).ok()?;
        self.cache.peek(&key, is_valid_manifest_value)
    }

    /// Force-refreshes the manifest for `lang`, returning the previously
    /// cached snapshot (if any) alongside the fresh one.
    pub async fn refresh_manifest(
        &self,
        lang: &str,
    ) -> RepositoryResult<(Option<Manifest>, Manifest)> {
        let previous = self.cached_manifest(lang).map(|entry| entry.data);
        let current = self.get_manifest(lang, FetchOptions::refresh()).await?;
        Ok((previous, current))
    }

    /// Languages with a cached manifest, discovered from cache file names.
    pub fn get_available_languages(&self) -> Vec<String> {
        self.cache
            .keys()
            .iter()
            .filter_map(|key| MANIFEST_KEY_RE.captures(key))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[async_trait]
impl CommandRepository for RemoteRepository {
    async fn get_manifest(&self, lang: &str, options: FetchOptions) -> RepositoryResult<Manifest> {
        Self::ensure_language(lang)?;
        let key = Self::manifest_key(lang)?;
        self.cache
            .get(
                &key,
                || self.fetch_manifest(lang),
                is_valid_manifest_value,
                options,
            )
            .await
    }

    async fn get_command(
        &self,
        name: &str,
        lang: &str,
        options: FetchOptions,
    ) -> RepositoryResult<String> {
        let manifest = self.get_manifest(lang, options).await?;
        let command = manifest
            .find(name)
            .ok_or_else(|| RepositoryError::CommandNotFound {
                name: name.to_string(),
                lang: lang.to_string(),
            })?;

        let key = Self::command_key(lang, name)?;
        let url = self.content_url(lang, &command.file);

        let content: String = self
            .cache
            .get(
                &key,
                || async {
                    self.http
                        .get(&url)
                        .await
                        .map(|response| response.body)
                        .map_err(|source| RepositoryError::CommandContent {
                            name: name.to_string(),
                            lang: lang.to_string(),
                            source,
                        })
                },
                Value::is_string,
                options,
            )
            .await?;

        if content.trim().is_empty() {
            warn!("Command '{}' ({}) has empty content", name, lang);
        }
        Ok(content)
    }
}
