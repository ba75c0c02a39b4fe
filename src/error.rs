//! Error types of the DNS and cache collaborators.
//!
//! None of these errors ever reach the caller of the selector. They exist
//! so that the collaborators can report what went wrong and the pipeline
//! can decide, based on plain data, whether to drop an address, treat a
//! cache as empty, or fall back to the default entrypoint.

#![warn(missing_docs)]

use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::Arc;

//------------ LookupError ---------------------------------------------------

/// A forward or reverse DNS lookup failed.
#[derive(Clone, Debug)]
pub enum LookupError {
    /// The name to look up is not a valid domain name.
    InvalidName(String),

    /// The name or address has no usable records.
    NotFound,

    /// The lookup did not finish within the configured timeout.
    Timeout,

    /// The lookup failed on the transport level.
    Io(Arc<io::Error>),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            LookupError::InvalidName(name) => {
                write!(f, "invalid domain name '{}'", name)
            }
            LookupError::NotFound => write!(f, "host not found"),
            LookupError::Timeout => write!(f, "lookup timed out"),
            LookupError::Io(err) => write!(f, "lookup failed: {}", err),
        }
    }
}

impl error::Error for LookupError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LookupError::InvalidName(_) => None,
            LookupError::NotFound => None,
            LookupError::Timeout => None,
            LookupError::Io(err) => Some(err.as_ref()),
        }
    }
}

impl From<io::Error> for LookupError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::TimedOut {
            LookupError::Timeout
        } else {
            LookupError::Io(Arc::new(err))
        }
    }
}

//------------ CacheError ----------------------------------------------------

/// The cache could not be read or written.
#[derive(Clone, Debug)]
pub enum CacheError {
    /// The cache store cannot be reached.
    Unavailable(String),

    /// The cache holds a value that cannot be used as a mirror list.
    Corrupt(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            CacheError::Unavailable(reason) => {
                write!(f, "cache unavailable: {}", reason)
            }
            CacheError::Corrupt(reason) => {
                write!(f, "corrupt cache entry: {}", reason)
            }
        }
    }
}

impl error::Error for CacheError {}

//============ Tests =========================================================
