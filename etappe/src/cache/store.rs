//! Content-addressed, TTL-governed memoization of upstream calls.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::cleanup::CleanupSweeper;
use super::clock::{Clock, SystemClock};
use super::key::RequestDescriptor;
use super::path::{entry_path, write_atomic};
use super::stats::CacheStats;
use super::types::{CacheError, Category};

/// Serialized form of an entry as read back from disk.
#[derive(Deserialize)]
struct StoredEntry<T> {
    written_at_ms: u64,
    payload: T,
}

/// Serialized form of an entry as written to disk.
#[derive(Serialize)]
struct StoredEntryRef<'a, T> {
    written_at_ms: u64,
    url: &'a str,
    payload: &'a T,
}

/// Outcome of looking an entry up on disk.
enum Lookup<T> {
    Fresh(T),
    Expired,
    Missing,
}

/// Disk-backed memoization layer for idempotent upstream requests.
///
/// Entries are keyed by a digest of the request and grouped by
/// [`Category`]. The store owns everything below its root directory.
///
/// # Failure Policy
///
/// - A failed fetch is returned to the caller as-is. An expired entry is
///   never served in its place.
/// - A failed write is logged and counted; the fetched value is still
///   returned.
/// - No single-flight locking: concurrent callers missing on the same key
///   may each fetch, and each atomically replaces the entry with the same
///   content.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    stats: Arc<CacheStats>,
}

impl CacheStore {
    /// Opens a store rooted at `root` using the system clock.
    ///
    /// Creates the root directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::new(root, Arc::new(SystemClock))
    }

    /// Opens a store with a custom time source.
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| CacheError::PathIo {
            path: root.clone(),
            source,
        })?;

        Ok(Self {
            root,
            clock,
            stats: Arc::new(CacheStats::new()),
        })
    }

    /// Records events into `stats` instead of the store's own counters.
    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counters this store records into.
    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    /// Time source of this store.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Creates a sweeper for this store's tree sharing its clock.
    pub fn sweeper(&self, lifetime: Duration) -> CleanupSweeper {
        CleanupSweeper::new(self.root.clone(), lifetime, Arc::clone(&self.clock))
    }

    /// Returns the cached value for `request`, or runs `fetch` and caches
    /// its result.
    ///
    /// An entry is used while its age is strictly below `ttl`. On a miss
    /// or expiry `fetch` is called exactly once; a successful result
    /// overwrites the entry. A cached payload that no longer deserializes
    /// into `T` counts as a miss.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`, unchanged.
    pub fn get_or_fetch<T, E, F>(
        &self,
        category: Category,
        request: &RequestDescriptor,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let key = request.cache_key();
        let path = entry_path(&self.root, category, &key);

        match self.lookup::<T>(&path, ttl) {
            Lookup::Fresh(value) => {
                self.stats.record_hit();
                trace!(category = %category, key = %key, "Cache hit");
                return Ok(value);
            }
            Lookup::Expired => {
                self.stats.record_expired();
                self.stats.record_miss();
                debug!(category = %category, key = %key, "Cache entry expired");
            }
            Lookup::Missing => {
                self.stats.record_miss();
                debug!(category = %category, key = %key, "Cache miss");
            }
        }

        self.stats.record_fetch();
        let value = match fetch() {
            Ok(value) => value,
            Err(e) => {
                self.stats.record_fetch_failure();
                debug!(
                    category = %category,
                    url = %request.url,
                    "Upstream fetch failed, nothing cached"
                );
                return Err(e);
            }
        };

        match self.write_entry(&path, &request.url, &value) {
            Ok(()) => {
                self.stats.record_write();
                debug!(category = %category, key = %key, "Cache entry written");
            }
            Err(e) => {
                self.stats.record_write_failure();
                warn!(
                    category = %category,
                    key = %key,
                    error = %e,
                    "Failed to write cache entry, returning uncached result"
                );
            }
        }

        Ok(value)
    }

    fn lookup<T: DeserializeOwned>(&self, path: &Path, ttl: Duration) -> Lookup<T> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Lookup::Missing,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable cache entry");
                return Lookup::Missing;
            }
        };

        let entry: StoredEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Undecodable cache entry");
                return Lookup::Missing;
            }
        };

        let age_ms = self.clock.now_millis().saturating_sub(entry.written_at_ms);
        if u128::from(age_ms) < ttl.as_millis() {
            Lookup::Fresh(entry.payload)
        } else {
            Lookup::Expired
        }
    }

    fn write_entry<T: Serialize>(&self, path: &Path, url: &str, value: &T) -> Result<(), CacheError> {
        let entry = StoredEntryRef {
            written_at_ms: self.clock.now_millis(),
            url,
            payload: value,
        };
        let data = serde_json::to_vec(&entry)?;
        write_atomic(path, &data)
    }
}
