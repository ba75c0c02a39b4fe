//! A time interface that can be replaced by a fake time implementation
//! during testing.
//!
//! The [`MemoryCache`][crate::cache::MemoryCache] uses a [`Clock`] to
//! decide whether a stored mirror list has expired.

#![warn(missing_docs)]

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

//------------ Clock ---------------------------------------------------------

/// A source of instants that know how much time has passed since they
/// were taken.
pub trait Clock: Clone + Send + Sync {
    /// The type that implements the [`Elapsed`] trait.
    type Instant: Clone + Debug + Elapsed + Send + Sync;

    /// Records the current time.
    fn now(&self) -> Self::Instant;
}

//------------ Elapsed --------------------------------------------------------

/// Reports the time that has passed since an instant was recorded.
pub trait Elapsed {
    /// Returns the elapsed time.
    fn elapsed(&self) -> Duration;
}

//------------ SystemClock ---------------------------------------------------

/// The real, monotonic system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }
}

impl Elapsed for Instant {
    fn elapsed(&self) -> Duration {
        Instant::elapsed(self)
    }
}

//------------ FakeClock -----------------------------------------------------

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another one to the cache under test.
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    /// The current fake time, counted from the creation of the clock.
    now: Arc<Mutex<Duration>>,
}

impl FakeClock {
    /// Creates a new clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|err| err.into_inner());
        *now = now.saturating_add(by);
    }

    /// Returns the current fake time.
    fn current(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Clock for FakeClock {
    type Instant = FakeInstant;

    fn now(&self) -> Self::Instant {
        FakeInstant {
            start: self.current(),
            clock: self.clone(),
        }
    }
}

//------------ FakeInstant ----------------------------------------------------

/// An instant taken from a [`FakeClock`].
#[derive(Clone, Debug)]
pub struct FakeInstant {
    /// When the instant was taken.
    start: Duration,

    /// The clock it was taken from.
    clock: FakeClock,
}

impl Elapsed for FakeInstant {
    fn elapsed(&self) -> Duration {
        self.clock.current().saturating_sub(self.start)
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_is_shared_between_clones() {
        let clock = FakeClock::new();
        let instant = clock.clone().now();
        assert_eq!(instant.elapsed(), Duration::ZERO);

        clock.advance(Duration::from_secs(90));
        assert_eq!(instant.elapsed(), Duration::from_secs(90));
        assert_eq!(clock.now().elapsed(), Duration::ZERO);
    }
}
