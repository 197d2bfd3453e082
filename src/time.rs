//! Clock facilities for stamping emissions and driving ticks.
//!
//! Timestamps throughout the crate are [`Duration`]s measured from a clock's
//! own epoch. The engine never reads the wall clock directly; it asks its
//! [`Clock`], so hosts and tests can substitute a [`ManualClock`].
//!
//! # Example
//!
//! ```ignore
//! use burstfx::time::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! clock.advance_by(Duration::from_millis(16));
//! assert_eq!(clock.now(), Duration::from_millis(16));
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of "now" for the engine.
pub trait Clock {
    /// Time elapsed since this clock's epoch.
    fn now(&self) -> Duration;
}

/// Wall-clock time based on [`Instant`], with its epoch at creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Uses interior mutability so a shared reference held by the engine can be
/// advanced by the host between ticks.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at the given time.
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Jump to an absolute time. Moving backwards is allowed here; the engine
    /// rejects backwards ticks on its own.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Move forward by `delta`.
    pub fn advance_by(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        thread::sleep(Duration::from_millis(5));
        assert!(clock.now() > first);
    }

    #[test]
    fn test_manual_clock_only_moves_when_told() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance_by(Duration::from_millis(16));
        clock.advance_by(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));

        clock.set(Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_clock_through_reference() {
        let clock = ManualClock::starting_at(Duration::from_millis(500));
        let by_ref: &ManualClock = &clock;
        assert_eq!(Clock::now(&by_ref), Duration::from_millis(500));
    }
}
