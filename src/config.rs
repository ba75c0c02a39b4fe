//! Configuration of mirror discovery.
//!
//! The [`Config`] type collects everything the
//! [`MirrorSelector`][crate::selector::MirrorSelector] needs to know: the
//! round-robin name to resolve, the entrypoint to fall back to, the cache
//! key and expiry of a discovered list, and how long a single DNS lookup
//! may take.
//!
//! Numeric settings are kept within sane bounds. A value outside the
//! allowed range is silently clamped by the setter.

#![warn(missing_docs)]

use std::cmp;
use std::time::Duration;
use tracing::debug;

//------------ Defaults ------------------------------------------------------

/// The well-known round-robin name of the radio-browser mirrors.
pub const DEFAULT_MIRROR_NAME: &str = "all.api.radio-browser.info";

/// The entrypoint used when no mirror could be discovered.
pub const DEFAULT_ENTRYPOINT: &str = "https://all.api.radio-browser.info";

/// The cache key a discovered mirror list is stored under.
pub const DEFAULT_CACHE_KEY: &str = "servers";

/// How long a discovered mirror list stays valid.
///
/// Mirrors come and go rarely, so once a day is plenty.
const CACHE_TTL: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_secs(24 * 3600),
    Duration::from_secs(1),
    Duration::from_secs(7 * 24 * 3600),
);

/// Limit on how long a single forward or reverse lookup may take.
const LOOKUP_TIMEOUT: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_secs(10),
    Duration::from_millis(100),
    Duration::from_secs(120),
);

//------------ DefMinMax -----------------------------------------------------

/// The default, minimum, and maximum values for a config variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DefMinMax<T> {
    /// The default value.
    def: T,

    /// The minimum value.
    min: T,

    /// The maximum value.
    max: T,
}

impl<T: Copy + Ord> DefMinMax<T> {
    /// Creates a new value.
    pub(crate) const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    pub(crate) fn default(self) -> T {
        self.def
    }

    /// Trims the given value to fit into the minimum/maximum range.
    pub(crate) fn limit(self, value: T) -> T {
        cmp::max(self.min, cmp::min(self.max, value))
    }
}

//------------ Config --------------------------------------------------------

/// Configuration of a mirror selector.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "ConfigRepr", into = "ConfigRepr")
)]
pub struct Config {
    /// The round-robin name listing all mirrors.
    mirror_name: String,

    /// The URL returned when discovery finds nothing.
    default_entrypoint: String,

    /// The key the mirror list is cached under.
    cache_key: String,

    /// Expiry of a discovered mirror list.
    cache_ttl: Duration,

    /// Expiry of the fallback list, if different from `cache_ttl`.
    fallback_ttl: Option<Duration>,

    /// Limit on the duration of a single lookup.
    lookup_timeout: Duration,

    /// Whether reverse lookups of one pass run concurrently.
    concurrent_reverse: bool,
}

impl Config {
    /// Creates a new config with default values.
    ///
    /// The default values are documented at the relevant set_* methods.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the round-robin DNS name that lists all mirrors.
    ///
    /// The default is `all.api.radio-browser.info`. An empty name is
    /// ignored.
    pub fn set_mirror_name(&mut self, name: impl Into<String>) {
        set_non_empty(&mut self.mirror_name, name.into(), "mirror_name")
    }

    /// Sets the URL used when no mirror could be discovered.
    ///
    /// The default is `https://all.api.radio-browser.info`. An empty value
    /// is ignored.
    pub fn set_default_entrypoint(&mut self, url: impl Into<String>) {
        set_non_empty(
            &mut self.default_entrypoint,
            url.into(),
            "default_entrypoint",
        )
    }

    /// Sets the key the mirror list is cached under.
    ///
    /// The default is `servers`. An empty key is ignored.
    pub fn set_cache_key(&mut self, key: impl Into<String>) {
        set_non_empty(&mut self.cache_key, key.into(), "cache_key")
    }

    /// Sets how long a discovered mirror list is cached.
    ///
    /// The value has to be at least one second, at most seven days and the
    /// default is one day.
    pub fn set_cache_ttl(&mut self, value: Duration) {
        self.cache_ttl = CACHE_TTL.limit(value)
    }

    /// Sets how long the fallback list is cached.
    ///
    /// The same bounds as for [`set_cache_ttl`][Self::set_cache_ttl]
    /// apply. Unless set, the fallback is cached as long as a discovered
    /// list.
    pub fn set_fallback_ttl(&mut self, value: Duration) {
        self.fallback_ttl = Some(CACHE_TTL.limit(value))
    }

    /// Sets the limit on how long a single DNS lookup may take.
    ///
    /// A lookup running into the limit counts as failed. The value has to
    /// be at least 100 milliseconds, at most two minutes and the default is
    /// ten seconds.
    pub fn set_lookup_timeout(&mut self, value: Duration) {
        self.lookup_timeout = LOOKUP_TIMEOUT.limit(value)
    }

    /// Enables or disables running the reverse lookups of a pass
    /// concurrently.
    ///
    /// The order of the resulting mirror list is the same either way. The
    /// default is false (sequential).
    pub fn set_concurrent_reverse(&mut self, value: bool) {
        self.concurrent_reverse = value
    }

    /// Returns the round-robin DNS name.
    pub fn mirror_name(&self) -> &str {
        &self.mirror_name
    }

    /// Returns the fallback entrypoint.
    pub fn default_entrypoint(&self) -> &str {
        &self.default_entrypoint
    }

    /// Returns the cache key.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Returns the expiry of a discovered mirror list.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Returns the expiry of the fallback list.
    pub fn fallback_ttl(&self) -> Duration {
        self.fallback_ttl.unwrap_or(self.cache_ttl)
    }

    /// Returns the limit on a single lookup.
    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Returns whether reverse lookups run concurrently.
    pub fn concurrent_reverse(&self) -> bool {
        self.concurrent_reverse
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirror_name: DEFAULT_MIRROR_NAME.into(),
            default_entrypoint: DEFAULT_ENTRYPOINT.into(),
            cache_key: DEFAULT_CACHE_KEY.into(),
            cache_ttl: CACHE_TTL.default(),
            fallback_ttl: None,
            lookup_timeout: LOOKUP_TIMEOUT.default(),
            concurrent_reverse: false,
        }
    }
}

fn set_non_empty(target: &mut String, value: String, what: &str) {
    if value.is_empty() {
        debug!("ignoring empty value for {}", what);
        return;
    }
    *target = value
}

//------------ ConfigRepr ----------------------------------------------------

/// The serialized form of a [`Config`].
///
/// Deserializing goes through the setters so that bounds apply to
/// configuration files as well.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ConfigRepr {
    mirror_name: String,
    default_entrypoint: String,
    cache_key: String,
    cache_ttl_secs: u64,
    fallback_ttl_secs: Option<u64>,
    lookup_timeout_ms: u64,
    concurrent_reverse: bool,
}

#[cfg(feature = "serde")]
impl Default for ConfigRepr {
    fn default() -> Self {
        Config::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<ConfigRepr> for Config {
    fn from(repr: ConfigRepr) -> Self {
        let mut config = Config::new();
        config.set_mirror_name(repr.mirror_name);
        config.set_default_entrypoint(repr.default_entrypoint);
        config.set_cache_key(repr.cache_key);
        config.set_cache_ttl(Duration::from_secs(repr.cache_ttl_secs));
        if let Some(secs) = repr.fallback_ttl_secs {
            config.set_fallback_ttl(Duration::from_secs(secs));
        }
        config
            .set_lookup_timeout(Duration::from_millis(repr.lookup_timeout_ms));
        config.set_concurrent_reverse(repr.concurrent_reverse);
        config
    }
}

#[cfg(feature = "serde")]
impl From<Config> for ConfigRepr {
    fn from(config: Config) -> Self {
        ConfigRepr {
            cache_ttl_secs: config.cache_ttl.as_secs(),
            fallback_ttl_secs: config.fallback_ttl.map(|ttl| ttl.as_secs()),
            lookup_timeout_ms: u64::try_from(
                config.lookup_timeout.as_millis(),
            )
            .unwrap_or(u64::MAX),
            concurrent_reverse: config.concurrent_reverse,
            mirror_name: config.mirror_name,
            default_entrypoint: config.default_entrypoint,
            cache_key: config.cache_key,
        }
    }
}

//============ Tests =========================================================
