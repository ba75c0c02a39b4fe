//! The mirror selector.
//!
//! [`MirrorSelector`] is what callers use to get hold of mirror URLs. It
//! serves the list from its cache while that is fresh. Otherwise it runs a
//! discovery pass:
//!
//! 1. resolve the round-robin name into addresses,
//! 2. reverse resolve every address into a canonical host name, skipping
//!    addresses without one,
//! 3. turn the hosts into `https://` URLs, keeping only the first
//!    appearance of each host,
//! 4. use the default entrypoint if nothing is left.
//!
//! Whatever the pass produced is stored in the cache and returned. The
//! returned list is never empty.

#![warn(missing_docs)]

use crate::cache::{MemoryCache, MirrorCache};
use crate::config::Config;
use crate::lookup::{Lookup, StubLookup};
use crate::mirror::{MirrorList, MirrorUrl};
use crate::namer::MirrorNamer;
use crate::resolver::Resolver;
use tokio::runtime;
use tracing::{debug, warn};

//------------ MirrorSelector ------------------------------------------------

/// Discovers mirrors via DNS and caches the result.
///
/// The selector owns a [`Lookup`] for talking to DNS and a [`MirrorCache`]
/// for keeping results. Wrap either in an `Arc` to share it with other
/// parts of the application. The selector itself can be shared between
/// threads and tasks if both are `Send` and `Sync`.
#[derive(Clone, Debug)]
pub struct MirrorSelector<L, C> {
    /// The source of DNS answers.
    lookup: L,

    /// Where discovered lists are kept.
    cache: C,

    /// The configuration of this selector.
    config: Config,
}

impl<L, C> MirrorSelector<L, C> {
    /// Creates a selector with default configuration.
    pub fn new(lookup: L, cache: C) -> Self {
        Self::with_config(lookup, cache, Config::default())
    }

    /// Creates a selector with the given configuration.
    pub fn with_config(lookup: L, cache: C, config: Config) -> Self {
        MirrorSelector {
            lookup,
            cache,
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the lookup.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Returns the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl MirrorSelector<StubLookup, MemoryCache> {
    /// Creates a selector using the system’s resolver and a private
    /// in-memory cache.
    pub fn system() -> Self {
        Self::new(StubLookup::new(), MemoryCache::new())
    }
}

impl<L: Lookup, C: MirrorCache> MirrorSelector<L, C> {
    /// Returns the current list of mirror URLs.
    ///
    /// The list is never empty. Lookups are bounded by the configured
    /// timeout, which requires the time driver of the Tokio runtime.
    pub async fn server_list(&self) -> MirrorList {
        if let Some(list) = self.cached() {
            return list;
        }
        let list = self.discover().await;
        self.store(list)
    }

    /// Returns the current list of mirror URLs, blocking.
    ///
    /// A cache miss is handled by running discovery on a private
    /// single-threaded runtime. This must not be called from within an
    /// asynchronous context.
    pub fn blocking_server_list(&self) -> MirrorList {
        if let Some(list) = self.cached() {
            return list;
        }
        let list = match runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.discover()),
            Err(err) => {
                warn!("cannot start runtime for mirror discovery: {}", err);
                MirrorList::new()
            }
        };
        self.store(list)
    }

    /// Runs a single discovery pass, bypassing the cache.
    ///
    /// Unlike [`server_list`][Self::server_list], this returns an empty
    /// list if no mirror was found and does not touch the cache.
    pub async fn discover(&self) -> MirrorList {
        let timeout = self.config.lookup_timeout();
        let addrs =
            Resolver::new(&self.lookup, self.config.mirror_name(), timeout)
                .addresses()
                .await;
        let namer = MirrorNamer::new(&self.lookup, timeout);
        let hosts = if self.config.concurrent_reverse() {
            namer.name_all(&addrs).await
        } else {
            namer.name_each(&addrs).await
        };
        hosts
            .into_iter()
            .flatten()
            .map(|host| MirrorUrl::from_host(&host))
            .collect()
    }

    /// Returns the cached list if there is a usable one.
    fn cached(&self) -> Option<MirrorList> {
        let key = self.config.cache_key();
        match self.cache.get(key) {
            Ok(Some(list)) if !list.is_empty() => {
                debug!("mirror list cache hit for {}", key);
                Some(list)
            }
            Ok(Some(_)) => {
                warn!("ignoring empty mirror list cached under {}", key);
                None
            }
            Ok(None) => {
                debug!("mirror list cache miss for {}", key);
                None
            }
            Err(err) => {
                warn!("failed to read mirror list cache: {}", err);
                None
            }
        }
    }

    /// Applies the fallback if necessary and caches the final list.
    fn store(&self, list: MirrorList) -> MirrorList {
        let (list, expire) = if list.is_empty() {
            warn!(
                "no mirrors found for {}, falling back to {}",
                self.config.mirror_name(),
                self.config.default_entrypoint()
            );
            let url = MirrorUrl::from_url(self.config.default_entrypoint());
            (MirrorList::single(url), self.config.fallback_ttl())
        } else {
            debug!("discovered {} mirror(s): {:?}", list.len(), list);
            (list, self.config.cache_ttl())
        };
        let key = self.config.cache_key();
        if let Err(err) = self.cache.set(key, &list, expire) {
            warn!("failed to write mirror list cache: {}", err);
        }
        list
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, LookupError};
    use crate::lookup::FixedLookup;
    use std::net::IpAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const NAME: &str = "all.api.radio-browser.info";

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    /// Remembers every expiry the selector asks for.
    #[derive(Default)]
    struct RecordingCache {
        inner: MemoryCache,
        expiries: Mutex<Vec<Duration>>,
    }

    impl MirrorCache for RecordingCache {
        fn get(&self, key: &str) -> Result<Option<MirrorList>, CacheError> {
            self.inner.get(key)
        }

        fn set(
            &self,
            key: &str,
            list: &MirrorList,
            expire: Duration,
        ) -> Result<(), CacheError> {
            self.expiries.lock().unwrap().push(expire);
            self.inner.set(key, list, expire)
        }
    }

    #[tokio::test]
    async fn fallback_uses_fallback_ttl() {
        let cache = Arc::new(RecordingCache::default());
        let mut config = Config::new();
        config.set_fallback_ttl(Duration::from_secs(300));
        let selector = MirrorSelector::with_config(
            FixedLookup::new().with_forward_error(NAME, LookupError::Timeout),
            cache.clone(),
            config,
        );
        assert_eq!(
            selector.server_list().await,
            ["https://all.api.radio-browser.info"]
        );
        assert_eq!(
            *cache.expiries.lock().unwrap(),
            [Duration::from_secs(300)]
        );
    }

    #[tokio::test]
    async fn discovered_list_uses_cache_ttl() {
        let cache = Arc::new(RecordingCache::default());
        let selector = MirrorSelector::new(
            FixedLookup::new()
                .with_addrs(NAME, [addr("45.80.1.120")])
                .with_host(addr("45.80.1.120"), "de1.api.radio-browser.info"),
            cache.clone(),
        );
        selector.server_list().await;
        assert_eq!(
            *cache.expiries.lock().unwrap(),
            [Duration::from_secs(86400)]
        );
    }

    #[tokio::test]
    async fn empty_cached_list_is_a_miss() {
        let cache = MemoryCache::new();
        cache
            .set("servers", &MirrorList::new(), Duration::from_secs(60))
            .unwrap();
        let lookup = Arc::new(
            FixedLookup::new()
                .with_addrs(NAME, [addr("192.0.2.1")])
                .with_host(addr("192.0.2.1"), "one.example"),
        );
        let selector = MirrorSelector::new(lookup.clone(), cache);
        assert_eq!(selector.server_list().await, ["https://one.example"]);
        assert_eq!(lookup.forward_queries(), 1);
    }

    #[tokio::test]
    async fn discover_does_not_fall_back() {
        let selector = MirrorSelector::new(
            FixedLookup::new().with_addrs(NAME, [addr("1.1.1.1")]),
            MemoryCache::new(),
        );
        assert!(selector.discover().await.is_empty());
        assert_eq!(selector.cache().get("servers").unwrap(), None);
    }

    #[test]
    fn blocking_server_list() {
        let lookup = Arc::new(
            FixedLookup::new()
                .with_addrs(NAME, [addr("45.80.1.120")])
                .with_host(addr("45.80.1.120"), "de1.api.radio-browser.info"),
        );
        let selector = MirrorSelector::new(lookup.clone(), MemoryCache::new());
        let first = selector.blocking_server_list();
        assert_eq!(first, ["https://de1.api.radio-browser.info"]);
        assert_eq!(selector.blocking_server_list(), first);
        assert_eq!(lookup.queries(), 2);
    }
}
