//! Bounded TTL cache for title details.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use crate::omdb::MovieDetail;

/// Default maximum number of cached details.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default time-to-live of a cached detail (10 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// A cached detail and the time it was stored.
#[derive(Debug)]
struct CacheEntry {
    /// Cached record.
    detail: MovieDetail,
    /// Time of the last `set` for this id.
    inserted_at: Instant,
}

/// Capacity- and time-bounded detail cache keyed by IMDb id.
///
/// Least-recently-used entries are evicted once the capacity is exceeded.
/// Expired entries are dropped lazily when read. Safe to share between
/// tasks and threads behind an `Arc`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct DetailCache {
    /// LRU-ordered entries.
    entries: Mutex<LruCache<String, CacheEntry>>,
    /// Maximum age of an entry.
    ttl: Duration,
}

impl DetailCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1) for `ttl`.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Locks the entries, recovering from a poisoned lock.
    ///
    /// Every mutation is a single `LruCache` call, so a panic elsewhere
    /// cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the cached detail, marking it most recently used.
    ///
    /// `None` if the id was never stored, was evicted, or has expired.
    #[must_use]
    pub fn get(&self, imdb_id: &str) -> Option<MovieDetail> {
        let mut entries = self.lock();
        let entry = entries.get(imdb_id)?;
        if entry.inserted_at.elapsed() < self.ttl {
            return Some(entry.detail.clone());
        }
        entries.pop(imdb_id);
        tracing::debug!(imdb_id, "Cached detail expired");
        None
    }

    /// Stores a detail, replacing any previous entry and resetting its age.
    pub fn set(&self, imdb_id: impl Into<String>, detail: MovieDetail) {
        let entry = CacheEntry {
            detail,
            inserted_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.lock().push(imdb_id.into(), entry) {
            tracing::trace!(imdb_id = %evicted, "Detail cache entry replaced or evicted");
        }
    }

    /// Number of stored entries, expired ones included until read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Time-to-live of entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for DetailCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
