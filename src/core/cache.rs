// src/core/cache.rs

//! TTL-keyed JSON cache in front of slow sources.
//!
//! Every key maps to one `{key}.json` file holding a [`CacheEntry`]. Read
//! problems (missing file, corrupt JSON, payload that fails validation) are
//! logged and treated as a miss; write problems are logged and dropped. Only
//! the fetch function's own error ever reaches the caller.

use crate::constants::{CACHE_FORMAT_VERSION, MAX_CACHE_KEY_COMPONENT_LEN, MAX_CACHE_KEY_LEN};
use crate::models::CacheEntry;
use log::{debug, trace, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    fmt, fs, io,
    future::Future,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

const HASH_TRUNCATE_LENGTH: usize = 16; // 16 bytes = 32 hex characters
const CACHE_FILE_EXTENSION: &str = "json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A key component was empty once separators, `..`, colons and NULs were stripped.
    #[error("Cache key component '{original}' is empty after sanitization")]
    EmptyKeyComponent {
        /// The component as it was passed in.
        original: String,
    },
}

/// Per-call knobs for [`CacheStore::get`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache read and always call the fetch function.
    pub force_refresh: bool,
}

impl FetchOptions {
    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}

/// A cache key built only from sanitized components, joined with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from its components (e.g. `["manifest", "en"]`).
    ///
    /// Keys longer than `MAX_CACHE_KEY_LEN` bytes are cut at a character
    /// boundary and suffixed with a digest of the full key, so they stay
    /// distinct and still fit in a file name.
    ///
    /// # Errors
    /// Returns `CacheError::EmptyKeyComponent` if any component sanitizes to
    /// nothing, since it would otherwise collide with other keys.
    pub fn new<I, S>(components: I) -> Result<Self, CacheError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts = components
            .into_iter()
            .map(|c| sanitize_component(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = parts.join("-");
        if joined.len() <= MAX_CACHE_KEY_LEN {
            return Ok(Self(joined));
        }

        let digest = content_digest(joined.as_bytes());
        let mut cut = MAX_CACHE_KEY_LEN.saturating_sub(digest.len() + 1);
        while !joined.is_char_boundary(cut) {
            cut -= 1;
        }
        let head = joined.get(..cut).unwrap_or_default();
        Ok(Self(format!("{}-{}", head, digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips path separators, `..`, colons and NUL bytes, then caps the length.
///
/// # Errors
/// Returns `CacheError::EmptyKeyComponent` if nothing is left.
pub fn sanitize_component(raw: &str) -> Result<String, CacheError> {
    let without_traversal = raw.replace("..", "");
    let cleaned: String = without_traversal
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '\0'))
        .take(MAX_CACHE_KEY_COMPONENT_LEN)
        .collect();

    if cleaned.trim().is_empty() {
        return Err(CacheError::EmptyKeyComponent {
            original: raw.to_string(),
        });
    }
    Ok(cleaned)
}

/// Milliseconds since the Unix epoch, saturating on overflow.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Hex-encoded, truncated blake3 digest used to fingerprint installed content.
pub fn content_digest(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    let truncated: Vec<u8> = hash
        .as_bytes()
        .iter()
        .take(HASH_TRUNCATE_LENGTH)
        .copied()
        .collect();
    hex::encode(truncated)
}

/// File-backed cache store. Owns the whole lifecycle of its files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key.as_str(), CACHE_FILE_EXTENSION))
    }

    /// Returns the cached value for `key` if it is fresh, otherwise calls
    /// `fetch`, persists its result (best effort), and returns it.
    ///
    /// `validate` is run against the raw cached payload before it is trusted.
    ///
    /// # Errors
    /// Only errors produced by `fetch` are returned.
    pub async fn get<T, E, F, Fut, V>(
        &self,
        key: &CacheKey,
        fetch: F,
        validate: V,
        options: FetchOptions,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        V: Fn(&Value) -> bool,
    {
        if options.force_refresh {
            debug!("Cache bypass (force refresh) for '{}'", key);
        } else if let Some(entry) = self.read_entry::<T, _>(key, &validate) {
            if self.is_fresh(entry.timestamp) {
                debug!("Cache hit for '{}'", key);
                return Ok(entry.data);
            }
            debug!("Cache entry for '{}' is stale", key);
        } else {
            debug!("Cache miss for '{}'", key);
        }

        let data = fetch().await?;

        if let Err(e) = self.write(key, &data) {
            warn!("Failed to write cache entry '{}': {}", key, e);
        }
        Ok(data)
    }

    /// Reads an entry regardless of its age. Used to look at the previous
    /// snapshot before refreshing it.
    pub fn peek<T, V>(&self, key: &CacheKey, validate: V) -> Option<CacheEntry<T>>
    where
        T: DeserializeOwned,
        V: Fn(&Value) -> bool,
    {
        self.read_entry(key, &validate)
    }

    fn is_fresh(&self, timestamp: u64) -> bool {
        let ttl_millis = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        now_millis().saturating_sub(timestamp) < ttl_millis
    }

    fn read_entry<T, V>(&self, key: &CacheKey, validate: &V) -> Option<CacheEntry<T>>
    where
        T: DeserializeOwned,
        V: Fn(&Value) -> bool,
    {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read cache file '{}': {}", path.display(), e);
                return None;
            }
        };

        let raw: CacheEntry<Value> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Ignoring corrupt cache file '{}': {}", path.display(), e);
                return None;
            }
        };

        if !validate(&raw.data) {
            warn!(
                "Ignoring cache file '{}': payload failed validation",
                path.display()
            );
            return None;
        }

        match serde_json::from_value(raw.data) {
            Ok(data) => Some(CacheEntry {
                data,
                timestamp: raw.timestamp,
                format_version: raw.format_version,
            }),
            Err(e) => {
                warn!("Ignoring cache file '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Persists `data` under `key`, replacing any previous entry.
    ///
    /// The entry is written to a sibling temp file and renamed into place so a
    /// reader never sees a half-written file.
    pub fn write<T: Serialize>(&self, key: &CacheKey, data: &T) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry {
            data,
            timestamp: now_millis(),
            format_version: CACHE_FORMAT_VERSION.to_string(),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(io::Error::other)?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension(format!("{}.tmp", CACHE_FILE_EXTENSION));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        trace!("Wrote cache entry '{}'", path.display());
        Ok(())
    }

    /// Names of every key currently on disk, sorted.
    pub fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(CACHE_FILE_EXTENSION))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        keys.sort();
        keys
    }

    /// Deletes every cache file. Returns how many were removed.
    pub fn clear(&self) -> io::Result<usize> {
        let mut removed = 0;
        for key in self.keys() {
            let path = self
                .dir
                .join(format!("{}.{}", key, CACHE_FILE_EXTENSION));
            fs::remove_file(&path)?;
            removed += 1;
        }
        debug!("Cleared {} cache entries from '{}'", removed, self.dir.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{NamedTempFile, TempDir};

    fn accept_all(_: &Value) -> bool {
        true
    }

    fn key(name: &str) -> CacheKey {
        CacheKey::new(["test", name]).unwrap()
    }

    async fn counted_get(
        store: &CacheStore,
        key: &CacheKey,
        calls: &Arc<AtomicUsize>,
        value: &str,
        options: FetchOptions,
    ) -> String {
        let calls = calls.clone();
        let value = value.to_string();
        store
            .get(
                key,
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, io::Error>(value)
                },
                accept_all,
                options,
            )
            .await
            .unwrap()
    }

    #[test]
    fn test_sanitize_component_strips_dangerous_characters() {
        assert_eq!(sanitize_component("en").unwrap(), "en");
        assert_eq!(sanitize_component("../../etc/passwd").unwrap(), "etcpasswd");
        assert_eq!(sanitize_component("frontend:component").unwrap(), "frontendcomponent");
        assert_eq!(sanitize_component("a\0b\\c").unwrap(), "abc");
    }

    #[test]
    fn test_sanitize_component_caps_length() {
        let long = "x".repeat(1000);
        assert_eq!(
            sanitize_component(&long).unwrap().len(),
            MAX_CACHE_KEY_COMPONENT_LEN
        );
    }

    #[test]
    fn test_sanitize_component_rejects_empty_result() {
        for raw in ["", "..", "/", "::", "../..", "\0"] {
            assert!(
                matches!(
                    sanitize_component(raw),
                    Err(CacheError::EmptyKeyComponent { .. })
                ),
                "'{}' should be rejected",
                raw.escape_debug()
            );
        }
        assert!(CacheKey::new(["command", "en", ".."]).is_err());
    }

    #[test]
    fn test_cache_key_joins_components() {
        let key = CacheKey::new(["command", "en", "git:commit"]).unwrap();
        assert_eq!(key.as_str(), "command-en-gitcommit");
    }

    #[test]
    fn test_long_keys_are_bounded_and_distinct() {
        let a = CacheKey::new(["command", "en", &"é".repeat(240)]).unwrap();
        let b = CacheKey::new(["command", "en", &format!("{}x", "é".repeat(239))]).unwrap();
        assert!(a.as_str().len() <= MAX_CACHE_KEY_LEN);
        assert!(b.as_str().len() <= MAX_CACHE_KEY_LEN);
        assert!(a.as_str().starts_with("command-en-é"));
        assert_ne!(a, b);

        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        store.write(&a, &"long".to_string()).unwrap();
        let entry: CacheEntry<String> = store.peek(&a, accept_all).unwrap();
        assert_eq!(entry.data, "long");
        assert!(store.peek::<String, _>(&b, accept_all).is_none());
    }

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key("hit");

        let first = counted_get(&store, &key, &calls, "fresh", FetchOptions::default()).await;
        let second = counted_get(&store, &key, &calls, "other", FetchOptions::default()).await;

        assert_eq!(first, "fresh");
        assert_eq!(second, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(dir.path().join("test-hit.json").exists());
    }

    #[tokio::test]
    async fn test_entry_older_than_ttl_is_refetched() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_millis(100));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key("ttl");

        counted_get(&store, &key, &calls, "v1", FetchOptions::default()).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let value = counted_get(&store, &key, &calls, "v2", FetchOptions::default()).await;

        assert_eq!(value, "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_entry() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key("force");

        counted_get(&store, &key, &calls, "v1", FetchOptions::default()).await;
        let value = counted_get(&store, &key, &calls, "v2", FetchOptions::refresh()).await;

        assert_eq!(value, "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key("corrupt");
        fs::write(dir.path().join("test-corrupt.json"), "{ not json").unwrap();

        let value = counted_get(&store, &key, &calls, "recovered", FetchOptions::default()).await;

        assert_eq!(value, "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The corrupt file was replaced by a valid entry.
        assert!(store.peek::<String, _>(&key, accept_all).is_some());
    }

    #[tokio::test]
    async fn test_failed_validation_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        let key = key("invalid");
        store.write(&key, &"cached".to_string()).unwrap();

        let value: String = store
            .get(
                &key,
                || async { Ok::<_, io::Error>("fetched".to_string()) },
                |_| false,
                FetchOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(value, "fetched");
    }

    #[tokio::test]
    async fn test_write_failure_does_not_fail_get() {
        // A regular file where the cache directory should be.
        let blocker = NamedTempFile::new().unwrap();
        let store = CacheStore::new(blocker.path().join("cache"), Duration::from_secs(60));

        let value: String = store
            .get(
                &key("unwritable"),
                || async { Ok::<_, io::Error>("data".to_string()) },
                accept_all,
                FetchOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(value, "data");
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));

        let result: Result<String, io::Error> = store
            .get(
                &key("error"),
                || async { Err(io::Error::other("offline")) },
                accept_all,
                FetchOptions::default(),
            )
            .await;

        assert!(result.is_err());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_entry_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        store.write(&key("layout"), &vec![1, 2, 3]).unwrap();

        let raw = fs::read_to_string(dir.path().join("test-layout.json")).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(value["version"], CACHE_FORMAT_VERSION);
        assert!(value["timestamp"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_keys_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path(), Duration::from_secs(60));
        store.write(&key("b"), &1).unwrap();
        store.write(&key("a"), &2).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.keys(), vec!["test-a", "test-b"]);
        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.keys().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_content_digest_is_stable() {
        // Truncated blake3 of "hello world".
        assert_eq!(content_digest(b"hello world"), "d74981efa70a0c880b8d8c1985d075db");
        assert_eq!(content_digest(b"").len(), HASH_TRUNCATE_LENGTH * 2);
    }
}
