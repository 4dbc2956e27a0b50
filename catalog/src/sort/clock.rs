//! Clock abstraction for timing sorts.
//!
//! Production code reads a monotonic clock; tests use [`ManualClock`] so that
//! reported durations are deterministic.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic clock.
pub trait Clock {
    /// Time elapsed since some fixed origin. Never goes backwards.
    fn now(&self) -> Duration;
}

/// Monotonic system clock, measured from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Every reading also advances the clock by `tick`, so a sort bracketed by two
/// readings reports exactly `tick`.
///
/// # Thread Safety
///
/// Uses [`Cell`] for interior mutability, so it is single-threaded only.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use catalog::sort::{Clock, ManualClock};
///
/// let clock = ManualClock::new(Duration::from_millis(5));
/// assert_eq!(clock.now(), Duration::ZERO);
/// assert_eq!(clock.now(), Duration::from_millis(5));
///
/// clock.advance(Duration::from_millis(100));
/// assert_eq!(clock.now(), Duration::from_millis(110));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<Duration>,
    tick: Duration,
}

impl ManualClock {
    /// Create a clock at zero that advances by `tick` per reading.
    #[must_use]
    pub const fn new(tick: Duration) -> Self {
        Self {
            current: Cell::new(Duration::ZERO),
            tick,
        }
    }

    /// Move the clock forward.
    ///
    /// Saturates at `Duration::MAX`.
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let now = self.current.get();
        self.current.set(now.saturating_add(self.tick));
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
