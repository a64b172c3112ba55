//! File-per-key cache store for one namespace.

use std::collections::HashSet;
use std::fs;
use std::future::Future;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::codec::{self, Outcome, Payload};
use crate::cache::error::{CacheError, KeyError};
use crate::cache::expiry;
use crate::cache::gate::Gate;
use crate::cache::naming::{self, CacheKey, KeyPrefix, TEMP_FILE_PREFIX};

/// A decoded entry together with the times its freshness is judged by.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry<T> {
    pub value: T,
    /// File mtime in unix milliseconds, when the platform reports one.
    pub modified_millis: Option<i64>,
    /// Clock reading taken while the entry was read.
    pub read_at_millis: i64,
}

impl<T> CachedEntry<T> {
    pub fn is_expired(&self, max_age: Duration) -> bool {
        expiry::is_entry_expired(self.modified_millis, self.read_at_millis, Some(max_age))
    }
}

/// Size of a namespace on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct NamespaceStats {
    pub entries: usize,
    pub total_bytes: u64,
}

struct RawEntry {
    bytes: Vec<u8>,
    modified_millis: Option<i64>,
    read_at_millis: i64,
}

/// On-disk cache for one namespace directory.
///
/// Every operation runs under the namespace's [`Gate`]. Environmental
/// failures never escape: reads degrade to a miss, writes to `false`.
#[derive(Debug, Clone)]
pub struct CacheStore {
    namespace: String,
    dir: PathBuf,
    gate: Gate,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Create a store for `<root>/<namespace>`.
    ///
    /// The directory is created lazily by the first `save`.
    pub fn new(root: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self, KeyError> {
        let namespace = namespace.into();
        // Namespace names follow the same rules as keys.
        CacheKey::new(namespace.as_str())?;
        let dir = root.as_ref().join(&namespace);
        Ok(Self {
            namespace,
            dir,
            gate: Gate::new(),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Load a single value, or `None` if absent, expired or corrupt.
    pub async fn load<T: Payload>(&self, key: &CacheKey, max_age: Option<Duration>) -> Option<T> {
        let raw = self.read_entry(key, max_age).await?;
        self.decoded(key, codec::decode(&raw.bytes))
    }

    /// Load a list of values, or `None` if absent, expired or corrupt.
    pub async fn load_list<T: Payload>(
        &self,
        key: &CacheKey,
        max_age: Option<Duration>,
    ) -> Option<Vec<T>> {
        let raw = self.read_entry(key, max_age).await?;
        self.decoded(key, codec::decode_list(&raw.bytes))
    }

    /// Load a success-or-failure payload.
    pub async fn load_outcome<S: Payload, F: Payload>(
        &self,
        key: &CacheKey,
        max_age: Option<Duration>,
    ) -> Option<Outcome<S, F>> {
        let raw = self.read_entry(key, max_age).await?;
        self.decoded(key, codec::decode_outcome(&raw.bytes))
    }

    /// Load a single value regardless of age, with the times needed to judge it.
    pub async fn load_entry<T: Payload>(&self, key: &CacheKey) -> Option<CachedEntry<T>> {
        let raw = self.read_entry(key, None).await?;
        let value = self.decoded(key, codec::decode(&raw.bytes))?;
        Some(CachedEntry {
            value,
            modified_millis: raw.modified_millis,
            read_at_millis: raw.read_at_millis,
        })
    }

    fn decoded<T>(&self, key: &CacheKey, result: Result<T, crate::cache::DecodeError>) -> Option<T> {
        match result {
            Ok(value) => {
                debug!(namespace = %self.namespace, key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(
                    namespace = %self.namespace,
                    key = %key,
                    error = %e,
                    "Unable to decode cache entry, treating as miss"
                );
                None
            }
        }
    }

    async fn read_entry(&self, key: &CacheKey, max_age: Option<Duration>) -> Option<RawEntry> {
        let path = self.path_for(key);
        let clock = self.clock.clone();
        let result = self
            .gate
            .run(move || read_if_fresh(&path, clock.as_ref(), max_age))
            .await
            .and_then(|inner| inner);

        match result {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => {
                debug!(namespace = %self.namespace, key = %key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(
                    namespace = %self.namespace,
                    key = %key,
                    error = %e,
                    "Unable to read cache entry, treating as miss"
                );
                None
            }
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace the entry for `key` with `value`. Returns whether it was written.
    pub async fn save<T: Payload>(&self, key: &CacheKey, value: &T) -> bool {
        self.write_encoded(key, codec::encode(value)).await
    }

    /// Replace the entry for `key` with a list of values.
    pub async fn save_list<T: Payload>(&self, key: &CacheKey, values: &[T]) -> bool {
        self.write_encoded(key, codec::encode_list(values)).await
    }

    /// Replace the entry for `key` with a success-or-failure payload.
    pub async fn save_outcome<S: Payload, F: Payload>(
        &self,
        key: &CacheKey,
        outcome: &Outcome<S, F>,
    ) -> bool {
        self.write_encoded(key, codec::encode_outcome(outcome)).await
    }

    async fn write_encoded(&self, key: &CacheKey, encoded: Result<Bytes, CacheError>) -> bool {
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(namespace = %self.namespace, key = %key, error = %e, "Unable to encode cache entry");
                return false;
            }
        };

        let dir = self.dir.clone();
        let path = self.path_for(key);
        let len = bytes.len();
        let result = self
            .gate
            .run(move || write_atomic(&dir, &path, &bytes))
            .await
            .and_then(|inner| inner);

        match result {
            Ok(()) => {
                debug!(namespace = %self.namespace, key = %key, bytes = len, "Cache entry written");
                true
            }
            Err(e) => {
                warn!(namespace = %self.namespace, key = %key, error = %e, "Unable to write cache entry");
                false
            }
        }
    }

    // ========================================================================
    // Deletes
    // ========================================================================

    /// Delete the entry for `key` if it exists.
    pub async fn purge(&self, key: &CacheKey) {
        let path = self.path_for(key);
        let result = self.gate.run(move || fs::remove_file(&path)).await;

        match result {
            Ok(Ok(())) => debug!(namespace = %self.namespace, key = %key, "Cache entry purged"),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {}
            Ok(Err(e)) => {
                warn!(namespace = %self.namespace, key = %key, error = %e, "Unable to purge cache entry")
            }
            Err(e) => {
                warn!(namespace = %self.namespace, key = %key, error = %e, "Unable to purge cache entry")
            }
        }
    }

    /// Delete every entry whose key starts with `prefix`. Returns the count removed.
    pub async fn purge_all(&self, prefix: &KeyPrefix) -> usize {
        let dir = self.dir.clone();
        let namespace = self.namespace.clone();
        let prefix = prefix.clone();
        let started = Instant::now();

        let deleted = self
            .gate
            .run(move || delete_with_prefix(&namespace, &dir, prefix.as_str()))
            .await
            .unwrap_or_else(|e| {
                warn!(namespace = %self.namespace, error = %e, "Bulk purge failed");
                0
            });

        info!(
            namespace = %self.namespace,
            deleted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Purged cache entries by prefix"
        );
        deleted
    }

    /// Delete every entry of any group that owns an expired or empty entry.
    ///
    /// `group_of` maps a key to its group, e.g. `"42_t_1"` to `"42"`.
    /// Returns the count removed.
    pub async fn sweep_expired(&self, max_age: Duration, group_of: fn(&str) -> &str) -> usize {
        let dir = self.dir.clone();
        let namespace = self.namespace.clone();
        let clock = self.clock.clone();
        let started = Instant::now();

        let deleted = self
            .gate
            .run(move || sweep_groups(&namespace, &dir, clock.now_millis(), max_age, group_of))
            .await
            .unwrap_or_else(|e| {
                warn!(namespace = %self.namespace, error = %e, "Expired sweep failed");
                0
            });

        info!(
            namespace = %self.namespace,
            deleted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Swept expired cache groups"
        );
        deleted
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Count entries and bytes in this namespace.
    pub async fn stats(&self) -> NamespaceStats {
        let dir = self.dir.clone();
        self.gate
            .run(move || {
                list_entries(&dir)
                    .into_iter()
                    .fold(NamespaceStats::default(), |mut stats, entry| {
                        stats.entries += 1;
                        stats.total_bytes += entry.len;
                        stats
                    })
            })
            .await
            .unwrap_or_default()
    }

    /// Load `key`, or on a miss run `fetch`, cache its value and return it.
    ///
    /// Errors from `fetch` are returned untouched; a failed cache write is
    /// only logged.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        max_age: Option<Duration>,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Payload,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.load(key, max_age).await {
            return Ok(cached);
        }

        let fresh = fetch().await?;
        self.save(key, &fresh).await;
        Ok(fresh)
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &Gate {
        &self.gate
    }
}

// ============================================================================
// Blocking filesystem operations (always called under the gate)
// ============================================================================

fn read_if_fresh(
    path: &Path,
    clock: &dyn Clock,
    max_age: Option<Duration>,
) -> Result<Option<RawEntry>, CacheError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };
    if !metadata.is_file() {
        return Ok(None);
    }

    let now = clock.now_millis();
    let modified = expiry::modified_millis(&metadata);
    if expiry::is_entry_expired(modified, now, max_age) {
        // Stale entries stay on disk until the next save or purge replaces them.
        debug!(path = %path.display(), "Cache entry expired");
        return Ok(None);
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };

    Ok(Some(RawEntry {
        bytes,
        modified_millis: modified,
        read_at_millis: now,
    }))
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    write_atomic_with(dir, path, bytes, persist_temp)
}

/// Write `bytes` to a temp file in `dir`, then hand it to `persist`.
///
/// The temp file is removed when `persist` fails, so `path` keeps its
/// previous contents.
fn write_atomic_with<P>(dir: &Path, path: &Path, bytes: &[u8], persist: P) -> Result<(), CacheError>
where
    P: FnOnce(NamedTempFile, &Path) -> Result<(), CacheError>,
{
    fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| CacheError::io(dir, e))?;

    temp.write_all(bytes)
        .map_err(|e| CacheError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| CacheError::io(temp.path(), e))?;

    persist(temp, path)
}

fn persist_temp(temp: NamedTempFile, path: &Path) -> Result<(), CacheError> {
    temp.persist(path)
        .map(|_| ())
        .map_err(|e| CacheError::io(path, e.error))
}

struct ListedEntry {
    name: String,
    path: PathBuf,
    len: u64,
    modified_millis: Option<i64>,
}

/// Regular, non-temporary files in `dir`. An unreadable directory is empty.
fn list_entries(dir: &Path) -> Vec<ListedEntry> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!(dir = %dir.display(), error = %e, "Unable to list cache directory");
            }
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Unable to read cache directory entry");
                None
            }
        })
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if naming::is_temp_file(&name) {
                return None;
            }
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(ListedEntry {
                name,
                path: entry.path(),
                len: metadata.len(),
                modified_millis: expiry::modified_millis(&metadata),
            })
        })
        .collect()
}

fn delete_with_prefix(namespace: &str, dir: &Path, prefix: &str) -> usize {
    delete_with_prefix_using(namespace, dir, prefix, |path| fs::remove_file(path))
}

/// Entries `remove` fails on are logged and skipped.
fn delete_with_prefix_using<R>(namespace: &str, dir: &Path, prefix: &str, remove: R) -> usize
where
    R: Fn(&Path) -> io::Result<()>,
{
    let mut deleted = 0;
    for entry in list_entries(dir) {
        if !entry.name.starts_with(prefix) {
            continue;
        }
        match remove(&entry.path) {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!(namespace, file = %entry.name, error = %e, "Unable to delete cache entry");
            }
        }
    }
    deleted
}

fn sweep_groups(
    namespace: &str,
    dir: &Path,
    now: i64,
    max_age: Duration,
    group_of: fn(&str) -> &str,
) -> usize {
    let entries = list_entries(dir);

    let expired_groups: HashSet<String> = entries
        .iter()
        .filter(|entry| {
            entry.len == 0 || expiry::is_entry_expired(entry.modified_millis, now, Some(max_age))
        })
        .map(|entry| group_of(&entry.name).to_string())
        .collect();

    let mut deleted = 0;
    for entry in &entries {
        if !expired_groups.contains(group_of(&entry.name)) {
            continue;
        }
        match fs::remove_file(&entry.path) {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!(namespace, file = %entry.name, error = %e, "Unable to delete expired cache entry");
            }
        }
    }
    deleted
}
