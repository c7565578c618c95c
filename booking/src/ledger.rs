//! The capacity ledger.
//!
//! Pure functions answering "is there room?" for both booking variants.
//! Nothing here stores a counter: the seat invariant is always computed as
//! a live sum over the current reservations, so releasing capacity on
//! reject/cancel needs no compensating write beyond the status change.
//!
//! The two-phase shape is deliberate and mandatory: a creation-time check
//! (`check_*_request`) and a confirm-time re-validation (`check_*_commit`)
//! that runs inside the repository's atomic unit and turns races into
//! [`BookingError::Conflict`].

use crate::error::BookingError;
use crate::types::{
    BookingStatus, DateRange, DateRental, RentalId, RentalOffer, ReservationId, SeatReservation,
    Trip,
};

// ============================================================================
// Seat variant
// ============================================================================

/// Live sum of seats held by pending and confirmed reservations.
#[must_use]
pub fn seats_held(reservations: &[SeatReservation]) -> u32 {
    reservations
        .iter()
        .filter(|r| r.status.holds_capacity())
        .map(|r| r.seats)
        .sum()
}

/// Live sum of seats held by confirmed reservations only.
#[must_use]
pub fn seats_committed(reservations: &[SeatReservation]) -> u32 {
    reservations
        .iter()
        .filter(|r| r.status == BookingStatus::Confirmed)
        .map(|r| r.seats)
        .sum()
}

/// Creation-time check for a seat request.
///
/// Accepts iff the live sum over pending and confirmed reservations, plus
/// the new request, stays within the trip capacity.
///
/// # Errors
///
/// - [`BookingError::Validation`] for a non-positive seat count
/// - [`BookingError::CapacityExceeded`] when the request would oversell the
///   trip; the request must not be created in that case
pub fn check_seat_request(
    trip: &Trip,
    existing: &[SeatReservation],
    seats: u32,
) -> Result<(), BookingError> {
    if seats == 0 {
        return Err(BookingError::Validation {
            reason: "seat count must be positive".to_string(),
        });
    }

    let held = seats_held(existing);
    // Widened sum: a huge request must refuse, not overflow.
    if u64::from(held) + u64::from(seats) > u64::from(trip.capacity) {
        return Err(BookingError::CapacityExceeded {
            reason: format!(
                "trip has {} of {} seats held; cannot add {seats} more",
                held, trip.capacity
            ),
        });
    }

    Ok(())
}

/// Confirm-time re-validation for a seat reservation.
///
/// Checks the live sum restricted to confirmed reservations plus this one.
/// If other confirmations raced ahead and capacity is now insufficient, the
/// accept fails and the reservation stays pending for the driver to handle.
///
/// # Errors
///
/// [`BookingError::Conflict`] when confirming would oversell the trip.
pub fn check_seat_commit(
    trip: &Trip,
    existing: &[SeatReservation],
    reservation_id: ReservationId,
) -> Result<(), BookingError> {
    let this = existing
        .iter()
        .find(|r| r.reservation_id == reservation_id)
        .ok_or(BookingError::NotFound)?;

    let committed = seats_committed(existing);
    if u64::from(committed) + u64::from(this.seats) > u64::from(trip.capacity) {
        return Err(BookingError::Conflict {
            reason: format!(
                "{committed} of {} seats already confirmed; confirming {} more would oversell",
                trip.capacity, this.seats
            ),
        });
    }

    Ok(())
}

// ============================================================================
// Date variant
// ============================================================================

/// Creation-time check for a rental request.
///
/// Overlapping pending requests from different requesters may coexist (the
/// owner chooses among them); only confirmed intervals block creation. The
/// interval itself is well-formed by construction of [`DateRange`].
///
/// # Errors
///
/// - [`BookingError::Validation`] when the offer is inactive or the rental
///   is shorter than the offer minimum
/// - [`BookingError::CapacityExceeded`] when the interval overlaps a
///   confirmed rental
pub fn check_rental_request(
    offer: &RentalOffer,
    existing: &[DateRental],
    range: &DateRange,
) -> Result<(), BookingError> {
    if !offer.active {
        return Err(BookingError::Validation {
            reason: "rental offer is not active".to_string(),
        });
    }

    if range.nights() < i64::from(offer.min_rental_days) {
        return Err(BookingError::Validation {
            reason: format!(
                "rental of {} nights is below the offer minimum of {}",
                range.nights(),
                offer.min_rental_days
            ),
        });
    }

    if let Some(confirmed) = existing
        .iter()
        .find(|r| r.status == BookingStatus::Confirmed && r.range.overlaps(range))
    {
        return Err(BookingError::CapacityExceeded {
            reason: format!("requested {range} overlaps confirmed rental {}", confirmed.range),
        });
    }

    Ok(())
}

/// Confirm-time re-validation for a date rental.
///
/// Guards against the race where two overlapping pending requests are
/// accepted concurrently: only the first atomic commit may succeed.
///
/// # Errors
///
/// [`BookingError::Conflict`] when the interval now overlaps a confirmed
/// rental.
pub fn check_rental_commit(
    existing: &[DateRental],
    rental_id: RentalId,
) -> Result<(), BookingError> {
    let this = existing
        .iter()
        .find(|r| r.rental_id == rental_id)
        .ok_or(BookingError::NotFound)?;

    if let Some(confirmed) = existing.iter().find(|r| {
        r.rental_id != rental_id
            && r.status == BookingStatus::Confirmed
            && r.range.overlaps(&this.range)
    }) {
        return Err(BookingError::Conflict {
            reason: format!(
                "interval {} was confirmed for another request while this one was pending",
                confirmed.range
            ),
        });
    }

    Ok(())
}

/// Competing pending rentals whose interval overlaps the one being
/// confirmed. The repository transitions these to rejected in the same
/// atomic step as the confirmation (cascading rejection).
#[must_use]
pub fn overlapping_pending(existing: &[DateRental], rental_id: RentalId) -> Vec<RentalId> {
    let Some(this) = existing.iter().find(|r| r.rental_id == rental_id) else {
        return Vec::new();
    };

    existing
        .iter()
        .filter(|r| {
            r.rental_id != rental_id
                && r.status == BookingStatus::Pending
                && r.range.overlaps(&this.range)
        })
        .map(|r| r.rental_id)
        .collect()
}
