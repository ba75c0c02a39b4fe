//! Finding the addresses behind the round-robin name.

use crate::error::LookupError;
use crate::lookup::Lookup;
use std::net::IpAddr;
use std::time::Duration;
use std::vec::Vec;
use tokio::time::timeout;
use tracing::{debug, warn};

//------------ Resolver ------------------------------------------------------

/// Looks up the mirror addresses currently advertised for a name.
///
/// Resolution is best effort. Whatever goes wrong, including the lookup
/// taking longer than the timeout, results in an empty address set rather
/// than an error.
pub struct Resolver<'a, L: ?Sized> {
    lookup: &'a L,
    name: &'a str,
    timeout: Duration,
}

impl<'a, L: Lookup + ?Sized> Resolver<'a, L> {
    /// Creates a resolver for `name` using `lookup`.
    pub fn new(lookup: &'a L, name: &'a str, timeout: Duration) -> Self {
        Resolver {
            lookup,
            name,
            timeout,
        }
    }

    /// Returns the advertised addresses in answer order.
    pub async fn addresses(&self) -> Vec<IpAddr> {
        match self.try_addresses().await {
            Ok(addrs) => {
                debug!(
                    "{} advertises {} address(es): {:?}",
                    self.name,
                    addrs.len(),
                    addrs
                );
                addrs
            }
            Err(err) => {
                warn!("failed to resolve {}: {}", self.name, err);
                Vec::new()
            }
        }
    }

    /// Returns the addresses or why there are none.
    pub async fn try_addresses(&self) -> Result<Vec<IpAddr>, LookupError> {
        match timeout(self.timeout, self.lookup.resolve(self.name)).await {
            Ok(res) => res,
            Err(_) => Err(LookupError::Timeout),
        }
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::FixedLookup;

    #[tokio::test]
    async fn failure_gives_empty_set() {
        let lookup = FixedLookup::new().with_forward_error(
            "mirrors.example",
            LookupError::Io(std::sync::Arc::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            ))),
        );
        let resolver =
            Resolver::new(&lookup, "mirrors.example", Duration::from_secs(1));
        assert!(resolver.addresses().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_answer_times_out() {
        let addr: IpAddr = "192.0.2.7".parse().unwrap();
        let lookup = FixedLookup::new()
            .with_addrs("mirrors.example", [addr])
            .with_forward_delay(Duration::from_secs(30));
        let resolver =
            Resolver::new(&lookup, "mirrors.example", Duration::from_secs(5));
        assert!(matches!(
            resolver.try_addresses().await,
            Err(LookupError::Timeout)
        ));
        assert!(resolver.addresses().await.is_empty());
    }

    #[tokio::test]
    async fn keeps_answer_order() {
        let addrs: Vec<IpAddr> = vec![
            "192.0.2.3".parse().unwrap(),
            "2001:db8::1".parse().unwrap(),
            "192.0.2.1".parse().unwrap(),
        ];
        let lookup =
            FixedLookup::new().with_addrs("mirrors.example", addrs.clone());
        let resolver =
            Resolver::new(&lookup, "mirrors.example", Duration::from_secs(1));
        assert_eq!(resolver.addresses().await, addrs);
    }
}
