//! Repository traits for the booking core.
//!
//! These traits are the callable surface of the core. The capacity-aware
//! operations (`create_*`, `confirm_*`) must execute as a single atomic,
//! serializable unit against their resource: a transaction in a database
//! implementation, a per-resource lock in the in-memory one. Operations on
//! different trips/offers are independent and may proceed in parallel.
//!
//! Ordering across concurrent confirms on the same resource is not
//! guaranteed to favor request order; the first to complete its atomic step
//! wins and losers receive [`crate::BookingError::Conflict`].

use crate::error::Result;
use crate::types::{
    Cancellation, DateRange, DateRental, OfferId, RentalId, RentalOffer, ReservationId,
    SeatReservation, Trip, TripId, UserId,
};
use std::future::Future;

/// Trip repository with capacity-aware reservation operations.
pub trait TripRepository: Send + Sync {
    /// Publish a new trip.
    ///
    /// # Errors
    ///
    /// Returns error if a trip with the same id already exists.
    fn create_trip(&self, trip: Trip) -> impl Future<Output = Result<Trip>> + Send;

    /// Get trip by id.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the trip does not exist.
    fn get_trip(&self, trip_id: TripId) -> impl Future<Output = Result<Trip>> + Send;

    /// List trips still accepting reservations.
    ///
    /// # Errors
    ///
    /// Returns error if the listing fails.
    fn list_open_trips(&self) -> impl Future<Output = Result<Vec<Trip>>> + Send;

    /// Create a seat reservation. Atomic: the seat-sum check and the insert
    /// happen in one step, so the trip can never be oversold at creation.
    ///
    /// # Errors
    ///
    /// - `BookingError::NotFound` if the trip does not exist
    /// - `BookingError::Validation` for a non-positive seat count or a trip
    ///   that is not open
    /// - `BookingError::CapacityExceeded` when the live seat sum would
    ///   exceed capacity; no reservation is created
    fn create_reservation(
        &self,
        trip_id: TripId,
        requester: UserId,
        seats: u32,
    ) -> impl Future<Output = Result<SeatReservation>> + Send;

    /// Accept a pending reservation. Atomic: re-validates the confirmed
    /// seat sum before committing.
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` unless `actor` is the trip driver
    /// - `BookingError::Conflict` when raced confirmations used up the
    ///   capacity; the reservation stays pending
    /// - `BookingError::AlreadyTerminal` on a terminal reservation
    fn confirm_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send;

    /// Decline a pending reservation.
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` unless `actor` is the trip driver
    /// - `BookingError::AlreadyTerminal` on a terminal reservation
    fn reject_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send;

    /// Withdraw a reservation. Pending reservations may be cancelled by the
    /// requester only; confirmed ones by either the requester or the
    /// driver, as long as the trip has not been completed. The result
    /// carries the early/late policy flag for the billing collaborator.
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` for any other actor
    /// - `BookingError::Conflict` when the trip is already completed
    /// - `BookingError::AlreadyTerminal` on a terminal reservation
    fn cancel_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<Cancellation<SeatReservation>>> + Send;

    /// Close out a confirmed reservation once the trip departure has
    /// passed. Time-based, driven by the system rather than either party.
    ///
    /// # Errors
    ///
    /// - `BookingError::Validation` when the departure is still ahead
    /// - `BookingError::AlreadyTerminal` on a terminal reservation
    fn complete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send;

    /// All reservations for a trip, any status.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the trip does not exist.
    fn reservations_for_trip(
        &self,
        trip_id: TripId,
    ) -> impl Future<Output = Result<Vec<SeatReservation>>> + Send;

    /// All reservations created by a requester, any trip, any status.
    ///
    /// # Errors
    ///
    /// Returns error if the listing fails.
    fn reservations_for_requester(
        &self,
        requester: UserId,
    ) -> impl Future<Output = Result<Vec<SeatReservation>>> + Send;
}

/// Rental-offer repository with capacity-aware booking operations.
pub trait RentalRepository: Send + Sync {
    /// Publish a new rental offer.
    ///
    /// # Errors
    ///
    /// Returns error if an offer with the same id already exists.
    fn create_offer(&self, offer: RentalOffer) -> impl Future<Output = Result<RentalOffer>> + Send;

    /// Get offer by id.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the offer does not exist.
    fn get_offer(&self, offer_id: OfferId) -> impl Future<Output = Result<RentalOffer>> + Send;

    /// List offers currently accepting requests.
    ///
    /// # Errors
    ///
    /// Returns error if the listing fails.
    fn list_active_offers(&self) -> impl Future<Output = Result<Vec<RentalOffer>>> + Send;

    /// Create a rental request. Overlapping pending requests may coexist;
    /// only confirmed intervals block creation.
    ///
    /// # Errors
    ///
    /// - `BookingError::NotFound` if the offer does not exist
    /// - `BookingError::Validation` for an inactive offer or a rental
    ///   shorter than the offer minimum
    /// - `BookingError::CapacityExceeded` when the interval overlaps a
    ///   confirmed rental; no request is created
    fn create_rental(
        &self,
        offer_id: OfferId,
        requester: UserId,
        range: DateRange,
    ) -> impl Future<Output = Result<DateRental>> + Send;

    /// Accept a pending rental. Atomic: re-validates against confirmed
    /// intervals and transitions every competing overlapping pending
    /// request to rejected in the same step (cascading rejection).
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` unless `actor` is the offer owner
    /// - `BookingError::Conflict` when an overlapping rental was confirmed
    ///   first; the rental stays pending
    /// - `BookingError::AlreadyTerminal` on a terminal rental
    fn confirm_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<DateRental>> + Send;

    /// Decline a pending rental.
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` unless `actor` is the offer owner
    /// - `BookingError::AlreadyTerminal` on a terminal rental
    fn reject_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<DateRental>> + Send;

    /// Withdraw a rental. Pending rentals may be cancelled by the requester
    /// only; confirmed ones by either the requester or the owner.
    ///
    /// # Errors
    ///
    /// - `BookingError::Unauthorized` for any other actor
    /// - `BookingError::AlreadyTerminal` on a terminal rental
    fn cancel_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<Cancellation<DateRental>>> + Send;

    /// Close out a confirmed rental once its end date has passed.
    ///
    /// # Errors
    ///
    /// - `BookingError::Validation` when the rental period is still running
    /// - `BookingError::AlreadyTerminal` on a terminal rental
    fn complete_rental(
        &self,
        rental_id: RentalId,
    ) -> impl Future<Output = Result<DateRental>> + Send;

    /// All rentals for an offer, any status.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the offer does not exist.
    fn rentals_for_offer(
        &self,
        offer_id: OfferId,
    ) -> impl Future<Output = Result<Vec<DateRental>>> + Send;

    /// All rentals created by a requester, any offer, any status.
    ///
    /// # Errors
    ///
    /// Returns error if the listing fails.
    fn rentals_for_requester(
        &self,
        requester: UserId,
    ) -> impl Future<Output = Result<Vec<DateRental>>> + Send;
}
