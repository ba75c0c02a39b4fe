#![allow(dead_code)]

use dns_mirrors::{Config, FixedLookup, MemoryCache, MirrorSelector};
use std::net::IpAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub const MIRROR_NAME: &str = "all.api.radio-browser.info";
pub const DEFAULT_ENTRYPOINT: &str = "https://all.api.radio-browser.info";

/// Setup logging of events reported by the selector and the test suite.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. To see every skipped address:
///   RUST_LOG=dns_mirrors=DEBUG
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}

pub fn addr(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// A selector with default configuration atop a shared fixed lookup.
pub type TestSelector = MirrorSelector<Arc<FixedLookup>, MemoryCache>;

pub fn selector(lookup: FixedLookup) -> (TestSelector, Arc<FixedLookup>) {
    selector_with_config(lookup, Config::new())
}

pub fn selector_with_config(
    lookup: FixedLookup,
    config: Config,
) -> (TestSelector, Arc<FixedLookup>) {
    init_logging();
    let lookup = Arc::new(lookup);
    let selector = MirrorSelector::with_config(
        lookup.clone(),
        MemoryCache::new(),
        config,
    );
    (selector, lookup)
}
