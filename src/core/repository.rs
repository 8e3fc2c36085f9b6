// src/core/repository.rs

//! The two-operation contract shared by the remote and local command sources,
//! and the domain errors both of them speak.

use crate::core::cache::{CacheError, FetchOptions};
use crate::models::Manifest;
use crate::system::http::HttpError;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The language is invalid, or the manifest is unreachable or malformed.
    #[error("Manifest error for language '{lang}': {message}")]
    Manifest {
        /// The requested language.
        lang: String,
        /// What went wrong.
        message: String,
        /// The transport error, when there was one.
        #[source]
        source: Option<HttpError>,
    },
    /// The name is absent from the manifest.
    #[error("Command '{name}' not found for language '{lang}'")]
    CommandNotFound {
        /// The requested command.
        name: String,
        /// The language that was searched.
        lang: String,
    },
    /// The command exists but its content could not be fetched.
    #[error("Failed to fetch content of command '{name}' ({lang}): {source}")]
    CommandContent {
        /// The requested command.
        name: String,
        /// The language of the manifest it came from.
        lang: String,
        /// The transport error.
        #[source]
        source: HttpError,
    },
    /// A locally discovered command file could not be read back.
    #[error("Failed to read local command '{name}' at '{path}': {source}")]
    LocalContent {
        /// The requested command.
        name: String,
        /// The file that failed.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A cache key could not be derived from the request.
    #[error("Invalid cache key: {0}")]
    CacheKey(#[from] CacheError),
}

impl RepositoryError {
    /// True for the one error kind other sources may tolerate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound { .. })
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A source of command manifests and command content.
#[async_trait]
pub trait CommandRepository: Send + Sync + fmt::Debug {
    /// Returns the manifest for `lang`.
    async fn get_manifest(&self, lang: &str, options: FetchOptions) -> RepositoryResult<Manifest>;

    /// Returns the raw content of the command called `name`.
    async fn get_command(
        &self,
        name: &str,
        lang: &str,
        options: FetchOptions,
    ) -> RepositoryResult<String>;
}
