//! Discovery and selection of API mirrors behind a round-robin DNS name.
//!
//! Some federated APIs are served by a set of independently operated
//! mirrors that share a single well-known DNS name. That name resolves to
//! the addresses of all mirrors, and each address points back to the
//! mirror’s own host name via reverse DNS. This crate turns the well-known
//! name into a deduplicated list of `https://` base URLs, one per mirror,
//! caches that list, and falls back to a fixed entrypoint when DNS is of no
//! help.
//!
//! The entry point is the [`MirrorSelector`]:
//!
//! ```no_run
//! use dns_mirrors::MirrorSelector;
//!
//! # async fn example() {
//! let selector = MirrorSelector::system();
//! let mirrors = selector.server_list().await;
//! let mirror = mirrors.choose(&mut rand::thread_rng());
//! println!("using {}", mirror.expect("never empty"));
//! # }
//! ```
//!
//! # Modules
//!
//! * [selector] contains the [`MirrorSelector`] that ties everything
//!   together,
//! * [resolver] and [namer] contain the forward and reverse resolution
//!   steps of a discovery pass,
//! * [lookup] defines the [`Lookup`] trait for the DNS queries themselves
//!   and provides an implementation atop the stub resolver of the
//!   [domain](https://docs.rs/domain) crate as well as one answering from a
//!   fixed table,
//! * [cache] defines the [`MirrorCache`] trait and an in-memory cache,
//! * [mirror] contains the [`MirrorUrl`] and [`MirrorList`] types,
//! * [config] contains the [`Config`] of a selector, and
//! * [clock] and [error] provide supporting types.
//!
//! Nothing in this crate fails loudly. DNS errors lead to fewer mirrors,
//! cache errors lead to a fresh discovery pass, and a pass that finds no
//! mirror at all yields the default entrypoint.
//!
//! # Reference of Feature Flags
//!
//! * `serde`: Enables serializing and deserializing [`Config`],
//!   [`MirrorUrl`], and [`MirrorList`] via
//!   [serde](https://serde.rs/), for instance for keeping mirror lists in
//!   an external cache.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::cache::{MemoryCache, MirrorCache};
pub use self::config::Config;
pub use self::error::{CacheError, LookupError};
pub use self::lookup::{FixedLookup, Lookup, StubLookup};
pub use self::mirror::{MirrorList, MirrorUrl};
pub use self::selector::MirrorSelector;

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod lookup;
pub mod mirror;
pub mod namer;
pub mod resolver;
pub mod selector;
