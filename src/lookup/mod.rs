//! Forward and reverse DNS lookups.
//!
//! Discovery only needs two things from DNS: the addresses behind the
//! round-robin name and the host name behind each of those addresses. The
//! [`Lookup`] trait captures exactly that, so the selector can be driven
//! by the real resolver in [`stub`] or by a fixed table from [`fixed`].
//!
//! Implementations report failures as [`LookupError`] values. They do not
//! need to bound the duration of a lookup, the
//! [`Resolver`][crate::resolver::Resolver] and
//! [`MirrorNamer`][crate::namer::MirrorNamer] apply the configured timeout
//! themselves.

#![warn(missing_docs)]

pub use self::fixed::FixedLookup;
pub use self::stub::StubLookup;

use crate::error::LookupError;
use std::boxed::Box;
use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::vec::Vec;

//------------ Sub-modules ---------------------------------------------------

pub mod fixed;
pub mod stub;

//------------ LookupFuture --------------------------------------------------

/// The future returned by the methods of [`Lookup`].
pub type LookupFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, LookupError>> + Send + 'a>>;

//------------ Lookup --------------------------------------------------------

/// A source of forward and reverse DNS answers.
pub trait Lookup {
    /// Returns the addresses currently advertised for `name`.
    ///
    /// The addresses are returned in the order the answer lists them. An
    /// empty vector is a valid answer.
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> LookupFuture<'a, Vec<IpAddr>>;

    /// Returns the host name an address points back to.
    fn reverse(&self, addr: IpAddr) -> LookupFuture<'_, String>;
}

impl<T: Lookup + ?Sized> Lookup for Arc<T> {
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> LookupFuture<'a, Vec<IpAddr>> {
        (**self).resolve(name)
    }

    fn reverse(&self, addr: IpAddr) -> LookupFuture<'_, String> {
        (**self).reverse(addr)
    }
}
