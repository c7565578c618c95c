//! Booking configuration.
//!
//! Policy values should be provided by the application, not hardcoded.

use chrono::Duration;

/// Booking policy configuration.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Notice required for a cancellation to count as early.
    ///
    /// Cancellations of confirmed bookings always succeed; this cutoff only
    /// decides the [`crate::types::CancellationTiming`] flag handed to the
    /// external billing collaborator.
    ///
    /// Default: 24 hours
    pub cancellation_cutoff: Duration,
}

impl BookingConfig {
    /// Create the default booking configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cancellation_cutoff: Duration::hours(24),
        }
    }

    /// Set the cancellation cutoff.
    #[must_use]
    pub const fn with_cancellation_cutoff(mut self, cutoff: Duration) -> Self {
        self.cancellation_cutoff = cutoff;
        self
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self::new()
    }
}
