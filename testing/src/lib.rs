//! # Tripmarket Testing
//!
//! Testing utilities and helpers for the Tripmarket crates.
//!
//! This crate provides:
//! - Mock clocks for deterministic time-dependent tests
//! - The [`ReducerTest`] Given-When-Then DSL for reducer units
//! - Assertion helpers for effects
//! - The [`drive`] helper that executes effect chains to completion
//!
//! ## Example
//!
//! ```ignore
//! use tripmarket_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(SessionReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::ResumeVisit)
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod drive;
pub mod reducer_test;

use chrono::{DateTime, Duration, Utc};
use tripmarket_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tripmarket_testing::mocks::FixedClock;
    /// use tripmarket_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that can be advanced manually.
    ///
    /// Useful for TTL tests where the same clock instance must report a
    /// later time after the test moves it forward.
    ///
    /// # Example
    ///
    /// ```
    /// use tripmarket_testing::mocks::SteppingClock;
    /// use tripmarket_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = SteppingClock::new(Utc::now());
    /// let start = clock.now();
    /// clock.advance(Duration::minutes(31));
    /// assert_eq!(clock.now() - start, Duration::minutes(31));
    /// ```
    #[derive(Debug, Clone)]
    pub struct SteppingClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl SteppingClock {
        /// Create a new stepping clock starting at the given time
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(start)),
            }
        }

        /// Move the clock forward by `step`.
        pub fn advance(&self, step: Duration) {
            if let Ok(mut guard) = self.time.lock() {
                *guard += step;
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use drive::drive;
pub use mocks::{FixedClock, SteppingClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::new(test_clock().now());
        let start = clock.now();
        clock.advance(Duration::minutes(29));
        assert_eq!(clock.now() - start, Duration::minutes(29));
        clock.advance(Duration::minutes(2));
        assert_eq!(clock.now() - start, Duration::minutes(31));
    }
}
