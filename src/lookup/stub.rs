//! Lookups through the system’s DNS stub resolver.

use super::{Lookup, LookupFuture};
use crate::error::LookupError;
use domain::base::name::Name;
use domain::resolv::stub::conf::ResolvConf;
use domain::resolv::StubResolver;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::vec::Vec;

//------------ StubLookup ----------------------------------------------------

/// A [`Lookup`] asking the configured recursive name servers.
///
/// Forward lookups ask for both A and AAAA records of the name. Reverse
/// lookups ask for the PTR records of the address’s `in-addr.arpa` or
/// `ip6.arpa` name and use the first host name found.
///
/// Values can be cloned cheaply, all clones share the same resolver.
#[derive(Clone)]
pub struct StubLookup {
    resolver: Arc<StubResolver>,
}

impl StubLookup {
    /// Creates a lookup using the system’s resolver configuration.
    pub fn new() -> Self {
        Self::from_resolver(StubResolver::new())
    }

    /// Creates a lookup using the given resolver configuration.
    pub fn from_conf(conf: ResolvConf) -> Self {
        Self::from_resolver(StubResolver::from_conf(conf))
    }

    /// Creates a lookup atop an existing resolver.
    pub fn from_resolver(resolver: StubResolver) -> Self {
        StubLookup {
            resolver: Arc::new(resolver),
        }
    }
}

impl Default for StubLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StubLookup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StubLookup").finish_non_exhaustive()
    }
}

impl Lookup for StubLookup {
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> LookupFuture<'a, Vec<IpAddr>> {
        Box::pin(async move {
            let qname = Name::<Vec<u8>>::from_str(name)
                .map_err(|_| LookupError::InvalidName(name.into()))?;
            let found = self.resolver.lookup_host(qname).await?;
            Ok(found.iter().collect())
        })
    }

    fn reverse(&self, addr: IpAddr) -> LookupFuture<'_, String> {
        Box::pin(async move {
            let found = self.resolver.lookup_addr(addr).await?;
            let host = found.iter().next().map(|name| name.to_string());
            host.ok_or(LookupError::NotFound)
        })
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_name_is_rejected_without_query() {
        let lookup = StubLookup::new();
        let name = format!("{}.example", "x".repeat(70));
        let res = lookup.resolve(&name).await;
        assert!(matches!(res, Err(LookupError::InvalidName(_))));
    }
}
