//! In-memory repositories with per-resource locking.
//!
//! Every trip/offer lives in its own `tokio::sync::Mutex` cell holding the
//! resource together with all of its bookings. A capacity-aware operation
//! locks exactly one cell, so check-then-commit on a resource is a single
//! serializable unit while operations on different resources proceed in
//! parallel. The outer maps are locked only long enough to look up or
//! insert a cell, never across an operation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use chrono::NaiveTime;
use tracing::{debug, info};
use tripmarket_core::environment::Clock;

use crate::config::BookingConfig;
use crate::error::{BookingError, Result};
use crate::ledger;
use crate::lifecycle::{BookingEvent, classify_cancellation, transition};
use crate::types::{
    Cancellation, DateRange, DateRental, OfferId, RentalId, RentalOffer, ReservationId,
    SeatReservation, Trip, TripId, TripStatus, UserId,
};

// ============================================================================
// Trips
// ============================================================================

/// A trip and all of its reservations, locked as one unit.
#[derive(Debug)]
struct TripCell {
    trip: Trip,
    reservations: Vec<SeatReservation>,
}

/// In-memory [`crate::providers::TripRepository`].
#[derive(Clone)]
pub struct MemoryTripRepository {
    clock: Arc<dyn Clock>,
    config: BookingConfig,
    trips: Arc<Mutex<HashMap<TripId, Arc<Mutex<TripCell>>>>>,
    // Reservation id -> owning trip, so booking-level operations can find
    // their cell without scanning.
    index: Arc<Mutex<HashMap<ReservationId, TripId>>>,
}

impl MemoryTripRepository {
    /// Create an empty trip repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: BookingConfig) -> Self {
        Self {
            clock,
            config,
            trips: Arc::new(Mutex::new(HashMap::new())),
            index: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn cell(&self, trip_id: TripId) -> Result<Arc<Mutex<TripCell>>> {
        self.trips
            .lock()
            .await
            .get(&trip_id)
            .cloned()
            .ok_or(BookingError::NotFound)
    }

    async fn cell_for_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Arc<Mutex<TripCell>>> {
        let trip_id = self
            .index
            .lock()
            .await
            .get(&reservation_id)
            .copied()
            .ok_or(BookingError::NotFound)?;
        self.cell(trip_id).await
    }

    fn position(cell: &TripCell, reservation_id: ReservationId) -> Result<usize> {
        cell.reservations
            .iter()
            .position(|r| r.reservation_id == reservation_id)
            .ok_or(BookingError::NotFound)
    }
}

#[cfg(feature = "test-utils")]
impl MemoryTripRepository {
    /// Insert a reservation bypassing the creation-time capacity check.
    ///
    /// Exists so race tests can stage states the creation path refuses
    /// (e.g. two pending reservations that jointly exceed capacity, as a
    /// weaker storage backend could produce). Never part of the production
    /// surface.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the trip does not exist.
    pub async fn seed_reservation(&self, reservation: SeatReservation) -> Result<()> {
        let cell = self.cell(reservation.trip_id).await?;
        let mut guard = cell.lock().await;
        self.index
            .lock()
            .await
            .insert(reservation.reservation_id, reservation.trip_id);
        guard.reservations.push(reservation);
        Ok(())
    }
}

impl crate::providers::TripRepository for MemoryTripRepository {
    fn create_trip(&self, trip: Trip) -> impl Future<Output = Result<Trip>> + Send {
        async move {
            let mut trips = self.trips.lock().await;
            if trips.contains_key(&trip.trip_id) {
                return Err(BookingError::Validation {
                    reason: format!("trip {} already exists", trip.trip_id),
                });
            }
            debug!(trip_id = %trip.trip_id, capacity = trip.capacity, "trip created");
            trips.insert(
                trip.trip_id,
                Arc::new(Mutex::new(TripCell {
                    trip: trip.clone(),
                    reservations: Vec::new(),
                })),
            );
            Ok(trip)
        }
    }

    fn get_trip(&self, trip_id: TripId) -> impl Future<Output = Result<Trip>> + Send {
        async move {
            let cell = self.cell(trip_id).await?;
            let guard = cell.lock().await;
            Ok(guard.trip.clone())
        }
    }

    fn list_open_trips(&self) -> impl Future<Output = Result<Vec<Trip>>> + Send {
        async move {
            let cells: Vec<_> = self.trips.lock().await.values().cloned().collect();
            let mut open = Vec::new();
            for cell in cells {
                let guard = cell.lock().await;
                if guard.trip.status == TripStatus::Open {
                    open.push(guard.trip.clone());
                }
            }
            Ok(open)
        }
    }

    fn create_reservation(
        &self,
        trip_id: TripId,
        requester: UserId,
        seats: u32,
    ) -> impl Future<Output = Result<SeatReservation>> + Send {
        async move {
            let cell = self.cell(trip_id).await?;
            let mut guard = cell.lock().await;

            if guard.trip.status != TripStatus::Open {
                return Err(BookingError::Validation {
                    reason: "trip is not open for reservations".to_string(),
                });
            }
            ledger::check_seat_request(&guard.trip, &guard.reservations, seats)?;

            let reservation = SeatReservation {
                reservation_id: ReservationId::new(),
                trip_id,
                requester,
                seats,
                status: crate::types::BookingStatus::Pending,
                created_at: self.clock.now(),
            };
            self.index
                .lock()
                .await
                .insert(reservation.reservation_id, trip_id);
            guard.reservations.push(reservation.clone());
            debug!(
                trip_id = %trip_id,
                reservation_id = %reservation.reservation_id,
                seats,
                "seat reservation created"
            );
            Ok(reservation)
        }
    }

    fn confirm_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send {
        async move {
            let cell = self.cell_for_reservation(reservation_id).await?;
            let mut guard = cell.lock().await;

            if actor != guard.trip.driver {
                return Err(BookingError::Unauthorized);
            }
            let idx = Self::position(&guard, reservation_id)?;
            let next = transition(guard.reservations[idx].status, BookingEvent::Accept)?;

            // Re-validation inside the lock: raced confirmations on this
            // trip either happened before us (and count here) or wait on
            // the same mutex.
            ledger::check_seat_commit(&guard.trip, &guard.reservations, reservation_id)?;

            guard.reservations[idx].status = next;
            info!(reservation_id = %reservation_id, "seat reservation confirmed");
            Ok(guard.reservations[idx].clone())
        }
    }

    fn reject_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send {
        async move {
            let cell = self.cell_for_reservation(reservation_id).await?;
            let mut guard = cell.lock().await;

            if actor != guard.trip.driver {
                return Err(BookingError::Unauthorized);
            }
            let idx = Self::position(&guard, reservation_id)?;
            let next = transition(guard.reservations[idx].status, BookingEvent::Reject)?;

            guard.reservations[idx].status = next;
            debug!(reservation_id = %reservation_id, "seat reservation rejected");
            Ok(guard.reservations[idx].clone())
        }
    }

    fn cancel_reservation(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> impl Future<Output = Result<Cancellation<SeatReservation>>> + Send {
        async move {
            let cell = self.cell_for_reservation(reservation_id).await?;
            let mut guard = cell.lock().await;

            let idx = Self::position(&guard, reservation_id)?;
            let current = guard.reservations[idx].clone();
            let next = transition(current.status, BookingEvent::Cancel)?;

            match current.status {
                crate::types::BookingStatus::Pending => {
                    if actor != current.requester {
                        return Err(BookingError::Unauthorized);
                    }
                }
                crate::types::BookingStatus::Confirmed => {
                    if actor != current.requester && actor != guard.trip.driver {
                        return Err(BookingError::Unauthorized);
                    }
                    if guard.trip.status == TripStatus::Completed {
                        return Err(BookingError::Conflict {
                            reason: "trip is already completed".to_string(),
                        });
                    }
                }
                // Terminal statuses already failed the transition above.
                _ => {}
            }

            let timing = classify_cancellation(
                self.clock.now(),
                guard.trip.departure_at,
                self.config.cancellation_cutoff,
            );
            guard.reservations[idx].status = next;
            debug!(reservation_id = %reservation_id, ?timing, "seat reservation cancelled");
            Ok(Cancellation {
                booking: guard.reservations[idx].clone(),
                timing,
            })
        }
    }

    fn complete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> impl Future<Output = Result<SeatReservation>> + Send {
        async move {
            let cell = self.cell_for_reservation(reservation_id).await?;
            let mut guard = cell.lock().await;

            let idx = Self::position(&guard, reservation_id)?;
            let next = transition(guard.reservations[idx].status, BookingEvent::Complete)?;

            if self.clock.now() < guard.trip.departure_at {
                return Err(BookingError::Validation {
                    reason: "trip has not departed yet".to_string(),
                });
            }

            guard.reservations[idx].status = next;
            Ok(guard.reservations[idx].clone())
        }
    }

    fn reservations_for_trip(
        &self,
        trip_id: TripId,
    ) -> impl Future<Output = Result<Vec<SeatReservation>>> + Send {
        async move {
            let cell = self.cell(trip_id).await?;
            let guard = cell.lock().await;
            Ok(guard.reservations.clone())
        }
    }

    fn reservations_for_requester(
        &self,
        requester: UserId,
    ) -> impl Future<Output = Result<Vec<SeatReservation>>> + Send {
        async move {
            let cells: Vec<_> = self.trips.lock().await.values().cloned().collect();
            let mut found = Vec::new();
            for cell in cells {
                let guard = cell.lock().await;
                found.extend(
                    guard
                        .reservations
                        .iter()
                        .filter(|r| r.requester == requester)
                        .cloned(),
                );
            }
            Ok(found)
        }
    }
}

// ============================================================================
// Rental offers
// ============================================================================

/// An offer and all of its rentals, locked as one unit.
#[derive(Debug)]
struct OfferCell {
    offer: RentalOffer,
    rentals: Vec<DateRental>,
}

/// In-memory [`crate::providers::RentalRepository`].
#[derive(Clone)]
pub struct MemoryRentalRepository {
    clock: Arc<dyn Clock>,
    config: BookingConfig,
    offers: Arc<Mutex<HashMap<OfferId, Arc<Mutex<OfferCell>>>>>,
    index: Arc<Mutex<HashMap<RentalId, OfferId>>>,
}

impl MemoryRentalRepository {
    /// Create an empty rental repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: BookingConfig) -> Self {
        Self {
            clock,
            config,
            offers: Arc::new(Mutex::new(HashMap::new())),
            index: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn cell(&self, offer_id: OfferId) -> Result<Arc<Mutex<OfferCell>>> {
        self.offers
            .lock()
            .await
            .get(&offer_id)
            .cloned()
            .ok_or(BookingError::NotFound)
    }

    async fn cell_for_rental(&self, rental_id: RentalId) -> Result<Arc<Mutex<OfferCell>>> {
        let offer_id = self
            .index
            .lock()
            .await
            .get(&rental_id)
            .copied()
            .ok_or(BookingError::NotFound)?;
        self.cell(offer_id).await
    }

    fn position(cell: &OfferCell, rental_id: RentalId) -> Result<usize> {
        cell.rentals
            .iter()
            .position(|r| r.rental_id == rental_id)
            .ok_or(BookingError::NotFound)
    }
}

impl crate::providers::RentalRepository for MemoryRentalRepository {
    fn create_offer(&self, offer: RentalOffer) -> impl Future<Output = Result<RentalOffer>> + Send {
        async move {
            let mut offers = self.offers.lock().await;
            if offers.contains_key(&offer.offer_id) {
                return Err(BookingError::Validation {
                    reason: format!("offer {} already exists", offer.offer_id),
                });
            }
            debug!(offer_id = %offer.offer_id, "rental offer created");
            offers.insert(
                offer.offer_id,
                Arc::new(Mutex::new(OfferCell {
                    offer: offer.clone(),
                    rentals: Vec::new(),
                })),
            );
            Ok(offer)
        }
    }

    fn get_offer(&self, offer_id: OfferId) -> impl Future<Output = Result<RentalOffer>> + Send {
        async move {
            let cell = self.cell(offer_id).await?;
            let guard = cell.lock().await;
            Ok(guard.offer.clone())
        }
    }

    fn list_active_offers(&self) -> impl Future<Output = Result<Vec<RentalOffer>>> + Send {
        async move {
            let cells: Vec<_> = self.offers.lock().await.values().cloned().collect();
            let mut active = Vec::new();
            for cell in cells {
                let guard = cell.lock().await;
                if guard.offer.active {
                    active.push(guard.offer.clone());
                }
            }
            Ok(active)
        }
    }

    fn create_rental(
        &self,
        offer_id: OfferId,
        requester: UserId,
        range: DateRange,
    ) -> impl Future<Output = Result<DateRental>> + Send {
        async move {
            let cell = self.cell(offer_id).await?;
            let mut guard = cell.lock().await;

            ledger::check_rental_request(&guard.offer, &guard.rentals, &range)?;

            let rental = DateRental {
                rental_id: RentalId::new(),
                offer_id,
                requester,
                range,
                status: crate::types::BookingStatus::Pending,
                created_at: self.clock.now(),
            };
            self.index.lock().await.insert(rental.rental_id, offer_id);
            guard.rentals.push(rental.clone());
            debug!(
                offer_id = %offer_id,
                rental_id = %rental.rental_id,
                range = %range,
                "rental request created"
            );
            Ok(rental)
        }
    }

    fn confirm_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<DateRental>> + Send {
        async move {
            let cell = self.cell_for_rental(rental_id).await?;
            let mut guard = cell.lock().await;

            if actor != guard.offer.owner {
                return Err(BookingError::Unauthorized);
            }
            let idx = Self::position(&guard, rental_id)?;
            let next = transition(guard.rentals[idx].status, BookingEvent::Accept)?;

            // Atomic step: re-validate, confirm, and cascade-reject the
            // competing overlapping pending requests under one lock.
            ledger::check_rental_commit(&guard.rentals, rental_id)?;
            let cascade = ledger::overlapping_pending(&guard.rentals, rental_id);
            for rental in &mut guard.rentals {
                if cascade.contains(&rental.rental_id) {
                    rental.status = transition(rental.status, BookingEvent::Reject)?;
                }
            }
            guard.rentals[idx].status = next;
            info!(
                rental_id = %rental_id,
                cascaded = cascade.len(),
                "rental confirmed"
            );
            Ok(guard.rentals[idx].clone())
        }
    }

    fn reject_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<DateRental>> + Send {
        async move {
            let cell = self.cell_for_rental(rental_id).await?;
            let mut guard = cell.lock().await;

            if actor != guard.offer.owner {
                return Err(BookingError::Unauthorized);
            }
            let idx = Self::position(&guard, rental_id)?;
            let next = transition(guard.rentals[idx].status, BookingEvent::Reject)?;

            guard.rentals[idx].status = next;
            debug!(rental_id = %rental_id, "rental rejected");
            Ok(guard.rentals[idx].clone())
        }
    }

    fn cancel_rental(
        &self,
        rental_id: RentalId,
        actor: UserId,
    ) -> impl Future<Output = Result<Cancellation<DateRental>>> + Send {
        async move {
            let cell = self.cell_for_rental(rental_id).await?;
            let mut guard = cell.lock().await;

            let idx = Self::position(&guard, rental_id)?;
            let current = guard.rentals[idx].clone();
            let next = transition(current.status, BookingEvent::Cancel)?;

            match current.status {
                crate::types::BookingStatus::Pending => {
                    if actor != current.requester {
                        return Err(BookingError::Unauthorized);
                    }
                }
                crate::types::BookingStatus::Confirmed => {
                    if actor != current.requester && actor != guard.offer.owner {
                        return Err(BookingError::Unauthorized);
                    }
                }
                _ => {}
            }

            let starts_at = current.range.start().and_time(NaiveTime::MIN).and_utc();
            let timing = classify_cancellation(
                self.clock.now(),
                starts_at,
                self.config.cancellation_cutoff,
            );
            guard.rentals[idx].status = next;
            debug!(rental_id = %rental_id, ?timing, "rental cancelled");
            Ok(Cancellation {
                booking: guard.rentals[idx].clone(),
                timing,
            })
        }
    }

    fn complete_rental(
        &self,
        rental_id: RentalId,
    ) -> impl Future<Output = Result<DateRental>> + Send {
        async move {
            let cell = self.cell_for_rental(rental_id).await?;
            let mut guard = cell.lock().await;

            let idx = Self::position(&guard, rental_id)?;
            let next = transition(guard.rentals[idx].status, BookingEvent::Complete)?;

            if self.clock.now().date_naive() < guard.rentals[idx].range.end() {
                return Err(BookingError::Validation {
                    reason: "rental period has not ended yet".to_string(),
                });
            }

            guard.rentals[idx].status = next;
            Ok(guard.rentals[idx].clone())
        }
    }

    fn rentals_for_offer(
        &self,
        offer_id: OfferId,
    ) -> impl Future<Output = Result<Vec<DateRental>>> + Send {
        async move {
            let cell = self.cell(offer_id).await?;
            let guard = cell.lock().await;
            Ok(guard.rentals.clone())
        }
    }

    fn rentals_for_requester(
        &self,
        requester: UserId,
    ) -> impl Future<Output = Result<Vec<DateRental>>> + Send {
        async move {
            let cells: Vec<_> = self.offers.lock().await.values().cloned().collect();
            let mut found = Vec::new();
            for cell in cells {
                let guard = cell.lock().await;
                found.extend(
                    guard
                        .rentals
                        .iter()
                        .filter(|r| r.requester == requester)
                        .cloned(),
                );
            }
            Ok(found)
        }
    }
}
