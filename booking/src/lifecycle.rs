//! The booking state machine.
//!
//! One transition table serves both domains (seat reservations and date
//! rentals). [`transition`] is the single entry point; repositories never
//! assign a status directly, so terminal finality cannot be bypassed at a
//! call site.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::error::BookingError;
use crate::types::{BookingStatus, CancellationTiming};

/// Events a booking can receive after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingEvent {
    /// Resource owner accepts the request (guarded by the ledger commit)
    Accept,
    /// Resource owner declines the request
    Reject,
    /// Requester (pending) or either party (confirmed) withdraws
    Cancel,
    /// System closes out a booking whose end time/date has passed
    Complete,
}

impl fmt::Display for BookingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        };
        write!(f, "{label}")
    }
}

/// Apply `event` to `status`, returning the next status.
///
/// | From      | Event    | To        |
/// |-----------|----------|-----------|
/// | Pending   | Accept   | Confirmed |
/// | Pending   | Reject   | Rejected  |
/// | Pending   | Cancel   | Cancelled |
/// | Confirmed | Cancel   | Cancelled |
/// | Confirmed | Complete | Completed |
///
/// # Errors
///
/// - [`BookingError::AlreadyTerminal`] when `status` is terminal
/// - [`BookingError::Validation`] for transitions the table does not allow
///   (e.g. completing a pending booking)
pub fn transition(status: BookingStatus, event: BookingEvent) -> Result<BookingStatus, BookingError> {
    match (status, event) {
        (BookingStatus::Pending, BookingEvent::Accept) => Ok(BookingStatus::Confirmed),
        (BookingStatus::Pending, BookingEvent::Reject) => Ok(BookingStatus::Rejected),
        (BookingStatus::Pending | BookingStatus::Confirmed, BookingEvent::Cancel) => {
            Ok(BookingStatus::Cancelled)
        }
        (BookingStatus::Confirmed, BookingEvent::Complete) => Ok(BookingStatus::Completed),
        (status, _) if status.is_terminal() => Err(BookingError::AlreadyTerminal { status }),
        (status, event) => Err(BookingError::Validation {
            reason: format!("{event} is not allowed from {status}"),
        }),
    }
}

/// Classify a cancellation against the configured cutoff.
///
/// A cancellation is early when at least `cutoff` of notice remains before
/// the booking starts (trip departure or first rental day).
#[must_use]
pub fn classify_cancellation(
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    cutoff: Duration,
) -> CancellationTiming {
    if starts_at - now >= cutoff {
        CancellationTiming::Early
    } else {
        CancellationTiming::Late
    }
}
