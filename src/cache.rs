//! Caching of discovered mirror lists.
//!
//! Discovery costs one forward and several reverse DNS lookups, so its
//! result is kept in a cache for a while. The selector talks to the cache
//! only through the [`MirrorCache`] trait: a plain get and a plain set with
//! an expiry. Neither operation is expected to be transactional. Two
//! callers missing the cache at the same time will both discover and both
//! store, and the last one wins.
//!
//! [`MemoryCache`] is an in-process implementation of the trait.

#![warn(missing_docs)]

use crate::clock::{Clock, Elapsed, SystemClock};
use crate::config::DefMinMax;
use crate::error::CacheError;
use crate::mirror::MirrorList;
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Configuration limit for the maximum number of entries in the cache.
const MAX_CACHE_ENTRIES: DefMinMax<u64> = DefMinMax::new(64, 1, 1_000_000);

//------------ MirrorCache ---------------------------------------------------

/// A key/value store for mirror lists with per-entry expiry.
pub trait MirrorCache {
    /// Returns the list stored under `key` unless it is missing or expired.
    fn get(&self, key: &str) -> Result<Option<MirrorList>, CacheError>;

    /// Stores `list` under `key` for the duration of `expire`.
    fn set(
        &self,
        key: &str,
        list: &MirrorList,
        expire: Duration,
    ) -> Result<(), CacheError>;
}

impl<T: MirrorCache + ?Sized> MirrorCache for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<MirrorList>, CacheError> {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        list: &MirrorList,
        expire: Duration,
    ) -> Result<(), CacheError> {
        (**self).set(key, list, expire)
    }
}

//------------ MemoryCache ---------------------------------------------------

/// An in-memory [`MirrorCache`].
///
/// Entries remember when they were stored according to the cache’s
/// [`Clock`] and are treated as absent once their age reaches their
/// expiry. The number of entries is bounded, the least useful ones are
/// evicted first.
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct MemoryCache<C: Clock = SystemClock> {
    /// The underlying store.
    cache: Cache<String, Arc<Entry<C>>>,

    /// The clock to use for expiring cache entries.
    clock: C,
}

impl MemoryCache {
    /// Creates a cache with the default capacity of 64 entries.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a cache holding at most `capacity` entries.
    ///
    /// The value has to be at least one and at most 1,000,000.
    pub fn with_capacity(capacity: u64) -> Self {
        Self::with_capacity_and_clock(capacity, SystemClock)
    }
}

impl<C: Clock + 'static> MemoryCache<C> {
    /// Creates a cache with default capacity using the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self::with_capacity_and_clock(MAX_CACHE_ENTRIES.default(), clock)
    }

    /// Creates a cache with the given capacity and clock.
    pub fn with_capacity_and_clock(capacity: u64, clock: C) -> Self {
        MemoryCache {
            cache: Cache::new(MAX_CACHE_ENTRIES.limit(capacity)),
            clock,
        }
    }

    /// Removes the entry stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        self.cache.invalidate(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> fmt::Debug for MemoryCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryCache").finish_non_exhaustive()
    }
}

impl<C: Clock + 'static> MirrorCache for MemoryCache<C> {
    fn get(&self, key: &str) -> Result<Option<MirrorList>, CacheError> {
        let entry = match self.cache.get(key) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        if entry.is_expired() {
            trace!("cache entry {} expired", key);
            self.cache.invalidate(key);
            return Ok(None);
        }
        Ok(Some(entry.list.clone()))
    }

    fn set(
        &self,
        key: &str,
        list: &MirrorList,
        expire: Duration,
    ) -> Result<(), CacheError> {
        if expire.is_zero() {
            // Would be expired right away.
            return Ok(());
        }
        let entry = Entry {
            list: list.clone(),
            stored: self.clock.now(),
            expire,
        };
        self.cache.insert(key.into(), Arc::new(entry));
        Ok(())
    }
}

//------------ Entry ---------------------------------------------------------

/// A stored mirror list.
struct Entry<C: Clock> {
    /// The list itself.
    list: MirrorList,

    /// When the list was stored.
    stored: C::Instant,

    /// How long the list may be used.
    expire: Duration,
}

impl<C: Clock> Entry<C> {
    /// Returns whether the entry may no longer be used.
    fn is_expired(&self) -> bool {
        self.stored.elapsed() >= self.expire
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::mirror::MirrorUrl;

    fn list(hosts: &[&str]) -> MirrorList {
        hosts.iter().map(|host| MirrorUrl::from_host(host)).collect()
    }

    #[test]
    fn get_returns_stored_list() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("servers").unwrap(), None);

        let servers = list(&["de1.example", "nl1.example"]);
        cache
            .set("servers", &servers, Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get("servers").unwrap(), Some(servers));
        assert_eq!(cache.get("other").unwrap(), None);
    }

    #[test]
    fn entries_expire() {
        let clock = FakeClock::new();
        let cache = MemoryCache::with_clock(clock.clone());
        let servers = list(&["de1.example"]);
        cache
            .set("servers", &servers, Duration::from_secs(3600))
            .unwrap();

        clock.advance(Duration::from_secs(3599));
        assert_eq!(cache.get("servers").unwrap(), Some(servers));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("servers").unwrap(), None);
    }

    #[test]
    fn zero_expiry_is_not_stored() {
        let cache = MemoryCache::new();
        cache
            .set("servers", &list(&["de1.example"]), Duration::ZERO)
            .unwrap();
        assert_eq!(cache.get("servers").unwrap(), None);
    }

    #[test]
    fn set_replaces_entry() {
        let cache = MemoryCache::new();
        let expire = Duration::from_secs(60);
        cache.set("servers", &list(&["a.example"]), expire).unwrap();
        cache.set("servers", &list(&["b.example"]), expire).unwrap();
        let stored = cache.get("servers").unwrap();
        assert_eq!(stored, Some(list(&["b.example"])));

        cache.remove("servers");
        assert_eq!(cache.get("servers").unwrap(), None);
    }
}
