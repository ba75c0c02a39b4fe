//! Recovering the canonical host names of mirror addresses.

use crate::error::LookupError;
use crate::lookup::Lookup;
use futures_util::future::join_all;
use std::net::IpAddr;
use std::time::Duration;
use std::vec::Vec;
use tokio::time::timeout;
use tracing::{debug, trace};

//------------ MirrorNamer ---------------------------------------------------

/// Turns mirror addresses into canonical host names via reverse DNS.
///
/// An address whose reverse lookup fails in any way, or takes longer than
/// the timeout, has no name. It is skipped by callers and does not affect
/// any other address.
pub struct MirrorNamer<'a, L: ?Sized> {
    lookup: &'a L,
    timeout: Duration,
}

impl<'a, L: Lookup + ?Sized> MirrorNamer<'a, L> {
    /// Creates a namer using `lookup`.
    pub fn new(lookup: &'a L, timeout: Duration) -> Self {
        MirrorNamer { lookup, timeout }
    }

    /// Returns the canonical host name of `addr` if there is one.
    pub async fn name(&self, addr: IpAddr) -> Option<String> {
        match self.try_name(addr).await {
            Ok(host) => {
                trace!("{} is {}", addr, host);
                Some(host)
            }
            Err(err) => {
                debug!("skipping {}: {}", addr, err);
                None
            }
        }
    }

    /// Returns the canonical host name of `addr` or why there is none.
    pub async fn try_name(
        &self,
        addr: IpAddr,
    ) -> Result<String, LookupError> {
        let lookup = self.lookup.reverse(addr);
        let host = match timeout(self.timeout, lookup).await {
            Ok(res) => res?,
            Err(_) => return Err(LookupError::Timeout),
        };
        let host = canonical(&host);
        if host.is_empty() {
            return Err(LookupError::NotFound);
        }
        Ok(host.into())
    }

    /// Names all addresses one after another.
    ///
    /// The result has one entry per address, in the same order.
    pub async fn name_each(&self, addrs: &[IpAddr]) -> Vec<Option<String>> {
        let mut res = Vec::with_capacity(addrs.len());
        for addr in addrs {
            res.push(self.name(*addr).await);
        }
        res
    }

    /// Names all addresses concurrently.
    ///
    /// The result has one entry per address in address order, no matter
    /// in which order the lookups finish.
    pub async fn name_all(&self, addrs: &[IpAddr]) -> Vec<Option<String>> {
        join_all(addrs.iter().map(|addr| self.name(*addr))).await
    }
}

/// Strips the trailing root label from a host name.
fn canonical(host: &str) -> &str {
    host.strip_suffix('.').unwrap_or(host)
}

//============ Tests =========================================================
