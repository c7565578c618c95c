//! Property tests for the capacity ledger and the booking lifecycle.
//!
//! These drive the pure check functions with generated request sequences
//! and assert the safety invariants hold for every interleaving the checks
//! admit.

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use tripmarket_booking::ledger::{
    check_rental_commit, check_rental_request, check_seat_commit, check_seat_request,
    overlapping_pending, seats_committed, seats_held,
};
use tripmarket_booking::lifecycle::{BookingEvent, transition};
use tripmarket_booking::types::{
    BookingStatus, DateRange, DateRental, Money, OfferId, RentalId, RentalOffer, ReservationId,
    SeatReservation, Trip, TripId, TripStatus, UserId, VehicleId,
};

fn trip(capacity: u32) -> Trip {
    Trip {
        trip_id: TripId::new(),
        driver: UserId::new(),
        origin: "Nantes".to_string(),
        destination: "Rennes".to_string(),
        departure_at: Utc::now(),
        price_per_seat: Money::from_cents(700),
        capacity,
        status: TripStatus::Open,
    }
}

fn offer() -> RentalOffer {
    RentalOffer {
        offer_id: OfferId::new(),
        owner: UserId::new(),
        vehicle: VehicleId::new(),
        price_per_day: Money::from_cents(3900),
        deposit: Money::from_cents(40_000),
        min_rental_days: 1,
        active: true,
    }
}

fn reservation(trip: &Trip, seats: u32) -> SeatReservation {
    SeatReservation {
        reservation_id: ReservationId::new(),
        trip_id: trip.trip_id,
        requester: UserId::new(),
        seats,
        status: BookingStatus::Pending,
        created_at: Utc::now(),
    }
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .map(|d| d + chrono::Duration::days(offset))
        .unwrap_or_default()
}

fn range(start: i64, len: i64) -> DateRange {
    DateRange::new(day(start), day(start + len)).unwrap_or_else(|_| unreachable!())
}

fn rental(offer: &RentalOffer, start: i64, len: i64) -> DateRental {
    DateRental {
        rental_id: RentalId::new(),
        offer_id: offer.offer_id,
        requester: UserId::new(),
        range: range(start, len),
        status: BookingStatus::Pending,
        created_at: Utc::now(),
    }
}

proptest! {
    /// Any sequence of creation-admitted seat requests keeps the live held
    /// sum within capacity.
    #[test]
    fn seat_requests_never_oversell(
        capacity in 1u32..=8,
        requests in prop::collection::vec(1u32..=4, 0..12),
    ) {
        let trip = trip(capacity);
        let mut existing: Vec<SeatReservation> = Vec::new();

        for seats in requests {
            if check_seat_request(&trip, &existing, seats).is_ok() {
                existing.push(reservation(&trip, seats));
            }
            prop_assert!(seats_held(&existing) <= trip.capacity);
        }
    }

    /// Confirming reservations in any order, with the commit re-validation
    /// deciding each, keeps the confirmed sum within capacity.
    #[test]
    fn seat_commits_never_oversell(
        capacity in 1u32..=6,
        seats in prop::collection::vec(1u32..=4, 1..10),
        order in prop::collection::vec(0usize..10, 1..10),
    ) {
        let trip = trip(capacity);
        // Seeded directly, as if they slipped past a weaker creation check.
        let mut existing: Vec<SeatReservation> =
            seats.iter().map(|&s| reservation(&trip, s)).collect();

        for pick in order {
            let idx = pick % existing.len();
            let id = existing[idx].reservation_id;
            if existing[idx].status == BookingStatus::Pending
                && check_seat_commit(&trip, &existing, id).is_ok()
            {
                existing[idx].status = transition(existing[idx].status, BookingEvent::Accept)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            prop_assert!(seats_committed(&existing) <= trip.capacity);
        }
    }

    /// Releasing capacity via reject or cancel makes room for a request of
    /// the freed size.
    #[test]
    fn released_capacity_is_reusable(
        capacity in 1u32..=6,
        seats in 1u32..=6,
    ) {
        prop_assume!(seats <= capacity);
        let trip = trip(capacity);
        let mut existing = vec![reservation(&trip, capacity)];

        // Trip is full: the new request must be refused
        prop_assert!(check_seat_request(&trip, &existing, seats).is_err());

        existing[0].status = transition(existing[0].status, BookingEvent::Cancel)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(check_seat_request(&trip, &existing, seats).is_ok());
    }

    /// After any order of commit-gated rental confirmations, no two
    /// confirmed rentals of the offer overlap.
    #[test]
    fn confirmed_rentals_never_overlap(
        starts in prop::collection::vec(0i64..20, 1..8),
        lens in prop::collection::vec(1i64..6, 1..8),
        order in prop::collection::vec(0usize..8, 1..8),
    ) {
        let offer = offer();
        let mut existing: Vec<DateRental> = starts
            .iter()
            .zip(&lens)
            .map(|(&s, &l)| rental(&offer, s, l))
            .collect();

        for pick in order {
            let idx = pick % existing.len();
            let id = existing[idx].rental_id;
            if existing[idx].status == BookingStatus::Pending
                && check_rental_commit(&existing, id).is_ok()
            {
                let cascade = overlapping_pending(&existing, id);
                for r in &mut existing {
                    if cascade.contains(&r.rental_id) {
                        r.status = transition(r.status, BookingEvent::Reject)
                            .map_err(|e| TestCaseError::fail(e.to_string()))?;
                    }
                }
                existing[idx].status = transition(existing[idx].status, BookingEvent::Accept)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }

            let confirmed: Vec<&DateRental> = existing
                .iter()
                .filter(|r| r.status == BookingStatus::Confirmed)
                .collect();
            for (i, a) in confirmed.iter().enumerate() {
                for b in &confirmed[i + 1..] {
                    prop_assert!(!a.range.overlaps(&b.range));
                }
            }
        }
    }

    /// Cascading rejection after a confirm leaves no pending rental that
    /// overlaps the confirmed one.
    #[test]
    fn cascade_clears_overlapping_pending(
        starts in prop::collection::vec(0i64..20, 2..8),
        lens in prop::collection::vec(1i64..6, 2..8),
    ) {
        let offer = offer();
        let mut existing: Vec<DateRental> = starts
            .iter()
            .zip(&lens)
            .map(|(&s, &l)| rental(&offer, s, l))
            .collect();

        let id = existing[0].rental_id;
        let confirmed_range = existing[0].range;
        let cascade = overlapping_pending(&existing, id);
        for r in &mut existing {
            if cascade.contains(&r.rental_id) {
                r.status = BookingStatus::Rejected;
            }
        }
        existing[0].status = BookingStatus::Confirmed;

        for r in existing.iter().skip(1) {
            if r.status == BookingStatus::Pending {
                prop_assert!(!r.range.overlaps(&confirmed_range));
            }
        }
    }

    /// Creation-admitted rental requests never overlap a confirmed rental.
    #[test]
    fn rental_requests_respect_confirmed_intervals(
        confirmed_start in 0i64..10,
        confirmed_len in 1i64..6,
        start in 0i64..20,
        len in 1i64..6,
    ) {
        let offer = offer();
        let mut blocker = rental(&offer, confirmed_start, confirmed_len);
        blocker.status = BookingStatus::Confirmed;
        let existing = vec![blocker.clone()];
        let request = range(start, len);

        match check_rental_request(&offer, &existing, &request) {
            Ok(()) => prop_assert!(!request.overlaps(&blocker.range)),
            Err(_) => prop_assert!(request.overlaps(&blocker.range)),
        }
    }

    /// Terminal statuses admit no transition at all.
    #[test]
    fn terminal_statuses_are_final(
        status_pick in 0usize..3,
        event_pick in 0usize..4,
    ) {
        let status = [
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ][status_pick];
        let event = [
            BookingEvent::Accept,
            BookingEvent::Reject,
            BookingEvent::Cancel,
            BookingEvent::Complete,
        ][event_pick];

        prop_assert!(transition(status, event).is_err());
    }
}
