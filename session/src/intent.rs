//! The intended-action store.
//!
//! When an anonymous visitor starts something that needs an account, the
//! action is parked here, the visitor goes through authentication (and
//! possibly first-time role selection), and the bootstrap flow picks the
//! action back up. One slot, last write wins, 30-minute freshness.
//!
//! Every operation degrades to absence: a failing backend loses the saved
//! intent (the visitor simply lands on the default page) but never breaks
//! the bootstrap. Expiry is lazy — a stale record is deleted on the read
//! that finds it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tripmarket_core::environment::Clock;

use crate::config::SessionConfig;
use crate::types::Mode;

/// What the visitor was trying to do before authentication interrupted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentKind {
    /// Reserve seats on a trip
    ReserveTrip,
    /// Book a vehicle rental
    BookRental,
    /// Publish a trip
    CreateTrip,
    /// Register a vehicle
    CreateVehicle,
    /// Publish a rental offer
    CreateRentalOffer,
    /// Review own seat reservations
    ViewReservations,
    /// Review own rental bookings
    ViewBookings,
    /// Manage registered vehicles
    ManageVehicles,
}

/// A parked action awaiting resumption after authentication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntendedAction {
    /// Where to navigate once the session is ready
    pub redirect_url: String,
    /// The interrupted action
    pub kind: IntentKind,
    /// Mode the action requires
    pub mode: Mode,
    /// When the intent was saved (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

/// Single-slot store for the pending intended action.
///
/// Infallible by contract: implementations log backend failures and
/// degrade to absence instead of surfacing errors.
pub trait IntentStore: Send + Sync {
    /// Park an action, replacing any previous one.
    fn save(&self, action: IntendedAction);

    /// The pending action, if present and fresh. A stale record is deleted
    /// and reported as absent.
    fn get(&self) -> Option<IntendedAction>;

    /// Drop the pending action, if any.
    fn clear(&self);
}

fn is_fresh(action: &IntendedAction, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
    now - action.saved_at < ttl
}

/// In-process single-slot intent store.
pub struct MemoryIntentStore {
    slot: Mutex<Option<IntendedAction>>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl MemoryIntentStore {
    /// Create an empty store with the TTL from `config`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
            ttl: config.intent_ttl,
        }
    }
}

impl IntentStore for MemoryIntentStore {
    fn save(&self, action: IntendedAction) {
        if let Ok(mut slot) = self.slot.lock() {
            debug!(kind = ?action.kind, "intent saved");
            *slot = Some(action);
        }
    }

    fn get(&self) -> Option<IntendedAction> {
        let mut slot = self.slot.lock().ok()?;
        match slot.as_ref() {
            Some(action) if is_fresh(action, self.clock.now(), self.ttl) => Some(action.clone()),
            Some(_) => {
                debug!("intent expired, treating as absent");
                *slot = None;
                None
            }
            None => None,
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Intent store persisted as a single JSON object on disk.
///
/// Survives process restarts within the freshness window. IO and parse
/// failures are logged at `warn` and reported as absence.
pub struct JsonFileIntentStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl JsonFileIntentStore {
    /// Create a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            path: path.into(),
            clock,
            ttl: config.intent_ttl,
        }
    }

    fn remove_file(&self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), %error, "failed to remove intent file");
            }
        }
    }
}

impl IntentStore for JsonFileIntentStore {
    fn save(&self, action: IntendedAction) {
        match serde_json::to_string(&action) {
            Ok(json) => {
                if let Err(error) = std::fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), %error, "failed to persist intent");
                }
            }
            Err(error) => {
                warn!(%error, "failed to serialize intent");
            }
        }
    }

    fn get(&self) -> Option<IntendedAction> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), %error, "failed to read intent file");
                }
                return None;
            }
        };

        let action: IntendedAction = match serde_json::from_str(&json) {
            Ok(action) => action,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "corrupt intent file, discarding");
                self.remove_file();
                return None;
            }
        };

        if is_fresh(&action, self.clock.now(), self.ttl) {
            Some(action)
        } else {
            debug!("intent expired, treating as absent");
            self.remove_file();
            None
        }
    }

    fn clear(&self) {
        self.remove_file();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tripmarket_testing::mocks::{SteppingClock, test_clock};

    fn intent(saved_at: DateTime<Utc>) -> IntendedAction {
        IntendedAction {
            redirect_url: "/trips/42/reserve".to_string(),
            kind: IntentKind::ReserveTrip,
            mode: Mode::Seeker,
            saved_at,
        }
    }

    #[test]
    fn test_memory_store_round_trip_and_last_write_wins() {
        let clock = Arc::new(SteppingClock::new(test_clock().now()));
        let store = MemoryIntentStore::new(clock.clone(), &SessionConfig::new());

        store.save(intent(clock.now()));
        let mut replacement = intent(clock.now());
        replacement.kind = IntentKind::CreateTrip;
        replacement.mode = Mode::Provider;
        store.save(replacement.clone());

        assert_eq!(store.get(), Some(replacement));
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_memory_store_expires_lazily() {
        let clock = Arc::new(SteppingClock::new(test_clock().now()));
        let store = MemoryIntentStore::new(clock.clone(), &SessionConfig::new());
        store.save(intent(clock.now()));

        clock.advance(Duration::minutes(29));
        assert!(store.get().is_some());

        clock.advance(Duration::minutes(2));
        assert_eq!(store.get(), None);
        // The expired record was deleted, not just hidden
        clock.advance(Duration::minutes(-10));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_round_trip_and_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intent.json");
        let clock = Arc::new(SteppingClock::new(test_clock().now()));
        let store = JsonFileIntentStore::new(&path, clock.clone(), &SessionConfig::new());

        store.save(intent(clock.now()));
        assert!(path.exists());
        assert!(store.get().is_some());

        clock.advance(Duration::minutes(31));
        assert_eq!(store.get(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_missing_and_corrupt_files_degrade_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intent.json");
        let clock = Arc::new(SteppingClock::new(test_clock().now()));
        let store = JsonFileIntentStore::new(&path, clock, &SessionConfig::new());

        assert_eq!(store.get(), None);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(store.get(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_wire_format_uses_epoch_milliseconds() {
        let action = intent(test_clock().now());
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"kind\":\"reserve-trip\""));
        assert!(json.contains("\"mode\":\"seeker\""));
        assert!(json.contains(&format!("\"saved_at\":{}", action.saved_at.timestamp_millis())));

        let back: IntendedAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
