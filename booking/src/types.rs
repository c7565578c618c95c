//! Domain types for the booking core.
//!
//! This module contains the value objects and entities shared by the seat
//! and rental variants of the booking lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::BookingError;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a user (driver, owner or requester)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(Uuid);

impl TripId {
    /// Creates a new random `TripId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TripId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a rental offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(Uuid);

impl OfferId {
    /// Creates a new random `OfferId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `OfferId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a vehicle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(Uuid);

impl VehicleId {
    /// Creates a new random `VehicleId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `VehicleId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a seat reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a date rental
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalId(Uuid);

impl RentalId {
    /// Creates a new random `RentalId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RentalId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RentalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Money in integer cents. Pricing in this core never goes beyond simple
/// multiplication, so no currency or rounding machinery is carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Create from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Get the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Multiply by a unit count (seats, nights)
    #[must_use]
    pub const fn multiply(&self, units: u64) -> Self {
        Self(self.0 * units)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Half-open date interval `[start, end)`.
///
/// The end date is the day the vehicle is returned; it is never itself a
/// rented day. Construction validates `start < end`, so a `DateRange` value
/// is well-formed by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new half-open range.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when `start >= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::Validation {
                reason: format!("rental end date {end} must be after start date {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// First rented day
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end day
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of rented nights. Always at least one.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether two half-open ranges share at least one day
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Booking Status
// ============================================================================

/// Lifecycle status shared by seat reservations and date rentals.
///
/// Transitions are applied only through [`crate::lifecycle::transition`];
/// the three terminal states admit no outgoing transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Awaiting the resource owner's decision
    Pending,
    /// Accepted by the resource owner
    Confirmed,
    /// Declined by the resource owner (terminal)
    Rejected,
    /// Withdrawn by either party (terminal)
    Cancelled,
    /// The underlying trip/rental period has passed (terminal)
    Completed,
}

impl BookingStatus {
    /// Whether this status admits no further transitions
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }

    /// Whether this booking still holds capacity (pending or confirmed)
    #[must_use]
    pub const fn holds_capacity(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        write!(f, "{label}")
    }
}

// ============================================================================
// Bookable Resources
// ============================================================================

/// Lifecycle status of a trip itself (not of its reservations)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    /// Accepting reservations
    Open,
    /// Called off by the driver
    Cancelled,
    /// Departure has passed and the trip was closed out
    Completed,
}

/// A driver-offered shared ride with fixed seat capacity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip identifier
    pub trip_id: TripId,
    /// The offering driver
    pub driver: UserId,
    /// Route start point
    pub origin: String,
    /// Route end point
    pub destination: String,
    /// Departure time
    pub departure_at: DateTime<Utc>,
    /// Price per seat
    pub price_per_seat: Money,
    /// Total seats offered
    pub capacity: u32,
    /// Trip lifecycle status
    pub status: TripStatus,
}

impl Trip {
    /// Total price for `seats` seats (simple multiplication)
    #[must_use]
    pub const fn total_price(&self, seats: u32) -> Money {
        self.price_per_seat.multiply(seats as u64)
    }
}

/// An owner-offered vehicle available for date-ranged rental
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RentalOffer {
    /// Offer identifier
    pub offer_id: OfferId,
    /// The offering owner
    pub owner: UserId,
    /// The vehicle being offered
    pub vehicle: VehicleId,
    /// Price per rented night
    pub price_per_day: Money,
    /// Deposit held for the rental (not part of the total)
    pub deposit: Money,
    /// Shortest rental accepted, in nights
    pub min_rental_days: u32,
    /// Whether the offer currently accepts requests
    pub active: bool,
}

impl RentalOffer {
    /// Total price for a rental over `range` (simple multiplication,
    /// deposit excluded)
    #[must_use]
    pub fn total_price(&self, range: &DateRange) -> Money {
        self.price_per_day.multiply(range.nights().unsigned_abs())
    }
}

// ============================================================================
// Booking Requests
// ============================================================================

/// A requester's claim on seats of a trip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatReservation {
    /// Reservation identifier
    pub reservation_id: ReservationId,
    /// The trip being reserved
    pub trip_id: TripId,
    /// The requesting passenger
    pub requester: UserId,
    /// Seats requested (positive)
    pub seats: u32,
    /// Lifecycle status
    pub status: BookingStatus,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

/// A requester's claim on a vehicle for a date range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRental {
    /// Rental identifier
    pub rental_id: RentalId,
    /// The offer being booked
    pub offer_id: OfferId,
    /// The requesting renter
    pub requester: UserId,
    /// Requested half-open interval
    pub range: DateRange,
    /// Lifecycle status
    pub status: BookingStatus,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Cancellation
// ============================================================================

/// Whether a cancellation landed before or after the configured cutoff.
///
/// The core records the timing only; whether a late cancellation incurs a
/// fee is decided by the external billing collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancellationTiming {
    /// Cancelled with at least the cutoff duration of notice
    Early,
    /// Cancelled inside the cutoff window
    Late,
}

/// Result of a cancel operation: the cancelled booking plus the policy flag
/// for the billing collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cancellation<T> {
    /// The booking after the cancel transition
    pub booking: T,
    /// Timing relative to the configured cutoff
    pub timing: CancellationTiming,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)]
    fn date(ymd: (i32, u32, u32)) -> NaiveDate {
        NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap()
    }

    #[test]
    fn test_id_uniqueness() {
        assert_ne!(TripId::new(), TripId::new());
        assert_ne!(ReservationId::new(), ReservationId::new());
    }

    #[test]
    fn test_money_multiply() {
        let per_seat = Money::from_cents(1250);
        assert_eq!(per_seat.multiply(3), Money::from_cents(3750));
        assert_eq!(format!("{}", per_seat), "12.50");
    }

    #[test]
    fn test_date_range_rejects_empty_interval() {
        let day = date((2025, 6, 10));
        assert!(DateRange::new(day, day).is_err());
        assert!(DateRange::new(date((2025, 6, 12)), day).is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_date_range_overlap_is_half_open() {
        let first = DateRange::new(date((2025, 6, 10)), date((2025, 6, 15))).unwrap();
        let adjacent = DateRange::new(date((2025, 6, 15)), date((2025, 6, 18))).unwrap();
        let overlapping = DateRange::new(date((2025, 6, 12)), date((2025, 6, 18))).unwrap();

        // The return day is bookable by the next renter
        assert!(!first.overlaps(&adjacent));
        assert!(first.overlaps(&overlapping));
        assert!(overlapping.overlaps(&first));
        assert_eq!(first.nights(), 5);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());

        assert!(BookingStatus::Pending.holds_capacity());
        assert!(BookingStatus::Confirmed.holds_capacity());
        assert!(!BookingStatus::Rejected.holds_capacity());
    }
}
