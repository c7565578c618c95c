//! # Tripmarket Booking
//!
//! Booking lifecycle and capacity-safety core for the Tripmarket platform.
//!
//! Two bookable domains share one lifecycle: seat reservations on a
//! driver-offered trip and date-ranged rentals of an owner-offered vehicle.
//! The crate is transport-agnostic; it exposes repository traits whose
//! capacity-aware operations are the callable surface an interface layer
//! (HTTP handlers, CLI) sits on top of.
//!
//! ## Layout
//!
//! - [`types`] - domain entities, ids, money, date ranges
//! - [`lifecycle`] - the five-state booking machine and its single
//!   transition entry point
//! - [`ledger`] - pure capacity checks (live seat sums, date overlap)
//! - [`providers`] - the `TripRepository` / `RentalRepository` traits
//! - [`stores`] - the in-memory, per-resource-locked implementation
//!
//! ## Invariants
//!
//! - Seat safety: the live sum of requested seats over pending and
//!   confirmed reservations of a trip never exceeds its capacity.
//! - Date safety: no two confirmed rentals of an offer overlap.
//! - Terminal finality: rejected, cancelled and completed bookings admit
//!   no further transitions.

pub mod config;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod providers;
pub mod stores;
pub mod types;

pub use config::BookingConfig;
pub use error::{BookingError, Result};
pub use lifecycle::{BookingEvent, transition};
pub use providers::{RentalRepository, TripRepository};
pub use stores::memory::{MemoryRentalRepository, MemoryTripRepository};
pub use types::{
    BookingStatus, Cancellation, CancellationTiming, DateRange, DateRental, Money, OfferId,
    RentalId, RentalOffer, ReservationId, SeatReservation, Trip, TripId, TripStatus, UserId,
    VehicleId,
};
