//! Error types for booking operations.

use crate::types::BookingStatus;
use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Error taxonomy for the booking core.
///
/// Capacity and terminal-state violations are never coerced into a
/// different outcome; they surface to the caller verbatim so the
/// presentation layer can explain the failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    /// Malformed request (non-positive seat count, empty date interval,
    /// rental shorter than the offer minimum, resource not accepting
    /// requests).
    #[error("validation failed: {reason}")]
    Validation {
        /// What was wrong with the request
        reason: String,
    },

    /// Creating the request would violate a capacity invariant.
    #[error("capacity exceeded: {reason}")]
    CapacityExceeded {
        /// Which invariant would be violated and by how much
        reason: String,
    },

    /// A race was detected at confirm time; the booking stays pending.
    #[error("conflict: {reason}")]
    Conflict {
        /// What the confirm re-validation found
        reason: String,
    },

    /// Transition attempted on a booking already in a terminal state.
    #[error("booking is already terminal ({status})")]
    AlreadyTerminal {
        /// The terminal status the booking is in
        status: BookingStatus,
    },

    /// Referenced trip, offer or booking does not exist.
    #[error("resource not found")]
    NotFound,

    /// Actor is neither the resource owner nor the requester, as applicable
    /// to the operation.
    #[error("actor is not permitted to perform this operation")]
    Unauthorized,
}

impl BookingError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tripmarket_booking::BookingError;
    /// let err = BookingError::Validation { reason: "zero seats".into() };
    /// assert!(err.is_user_error());
    /// assert!(!BookingError::NotFound.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Unauthorized)
    }

    /// Returns `true` if this error reports a capacity-safety refusal
    /// (creation check, confirm re-validation or terminal finality).
    #[must_use]
    pub const fn is_capacity_refusal(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. } | Self::Conflict { .. } | Self::AlreadyTerminal { .. }
        )
    }
}
