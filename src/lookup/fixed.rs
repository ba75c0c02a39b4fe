//! Lookups answered from a fixed table.
//!
//! A [`FixedLookup`] is useful where mirrors are known up front, for
//! instance in an isolated deployment, and for exercising the discovery
//! pipeline against well-defined DNS behaviour. It counts the queries it
//! answers and can be told to take its time with an answer.

use super::{Lookup, LookupFuture};
use crate::error::LookupError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use std::vec::Vec;
use tokio::time::sleep;

//------------ FixedLookup ---------------------------------------------------

/// A [`Lookup`] with canned answers.
///
/// Names and addresses without an entry are answered with
/// [`LookupError::NotFound`].
#[derive(Debug, Default)]
pub struct FixedLookup {
    /// Answers for forward lookups.
    forward: HashMap<String, Result<Vec<IpAddr>, LookupError>>,

    /// Answers for reverse lookups.
    reverse: HashMap<IpAddr, Result<String, LookupError>>,

    /// Delay before answering a forward lookup.
    forward_delay: Option<Duration>,

    /// Delays before answering reverse lookups for certain addresses.
    reverse_delay: HashMap<IpAddr, Duration>,

    /// Number of forward lookups answered so far.
    forward_queries: AtomicUsize,

    /// Number of reverse lookups answered so far.
    reverse_queries: AtomicUsize,
}

impl FixedLookup {
    /// Creates a lookup that knows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the addresses advertised for `name`.
    pub fn with_addrs(
        mut self,
        name: impl Into<String>,
        addrs: impl IntoIterator<Item = IpAddr>,
    ) -> Self {
        self.forward
            .insert(name.into(), Ok(addrs.into_iter().collect()));
        self
    }

    /// Makes forward lookups of `name` fail.
    pub fn with_forward_error(
        mut self,
        name: impl Into<String>,
        err: LookupError,
    ) -> Self {
        self.forward.insert(name.into(), Err(err));
        self
    }

    /// Adds the host name `addr` points back to.
    pub fn with_host(
        mut self,
        addr: IpAddr,
        host: impl Into<String>,
    ) -> Self {
        self.reverse.insert(addr, Ok(host.into()));
        self
    }

    /// Makes reverse lookups of `addr` fail.
    pub fn with_reverse_error(
        mut self,
        addr: IpAddr,
        err: LookupError,
    ) -> Self {
        self.reverse.insert(addr, Err(err));
        self
    }

    /// Delays every forward answer.
    pub fn with_forward_delay(mut self, delay: Duration) -> Self {
        self.forward_delay = Some(delay);
        self
    }

    /// Delays the reverse answer for `addr`.
    pub fn with_reverse_delay(
        mut self,
        addr: IpAddr,
        delay: Duration,
    ) -> Self {
        self.reverse_delay.insert(addr, delay);
        self
    }

    /// Returns the number of forward lookups started so far.
    pub fn forward_queries(&self) -> usize {
        self.forward_queries.load(Ordering::Relaxed)
    }

    /// Returns the number of reverse lookups started so far.
    pub fn reverse_queries(&self) -> usize {
        self.reverse_queries.load(Ordering::Relaxed)
    }

    /// Returns the total number of lookups started so far.
    pub fn queries(&self) -> usize {
        self.forward_queries() + self.reverse_queries()
    }
}

impl Lookup for FixedLookup {
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> LookupFuture<'a, Vec<IpAddr>> {
        self.forward_queries.fetch_add(1, Ordering::Relaxed);
        Box::pin(async move {
            if let Some(delay) = self.forward_delay {
                sleep(delay).await;
            }
            self.forward
                .get(name)
                .cloned()
                .unwrap_or(Err(LookupError::NotFound))
        })
    }

    fn reverse(&self, addr: IpAddr) -> LookupFuture<'_, String> {
        self.reverse_queries.fetch_add(1, Ordering::Relaxed);
        Box::pin(async move {
            if let Some(delay) = self.reverse_delay.get(&addr) {
                sleep(*delay).await;
            }
            self.reverse
                .get(&addr)
                .cloned()
                .unwrap_or(Err(LookupError::NotFound))
        })
    }
}

//============ Tests =========================================================
