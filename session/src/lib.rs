//! # Tripmarket Session
//!
//! Session bootstrap and intended-action resumption for the Tripmarket
//! platform.
//!
//! An anonymous visitor who starts an action that needs an account gets
//! that action parked in the [`intent`] store, goes through
//! authentication, picks a marketplace mode on first sign-in, and is then
//! navigated back to what they were doing. The flow is a reducer-driven
//! state machine:
//!
//! ```text
//! Anonymous → Authenticating → AuthenticatedNoMode → AuthenticatedReady
//! ```
//!
//! ## Layout
//!
//! - [`intent`] - single-slot intended-action store (memory and JSON file)
//! - [`reducer`] / [`store`] - the bootstrap state machine and the store
//!   that executes its effects
//! - [`role`] - first-time marketplace mode selection
//! - [`providers`] - auth and mode-persistence seams
//! - [`mocks`] - mock providers for tests

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod intent;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod providers;
pub mod reducer;
pub mod role;
pub mod state;
pub mod store;
pub mod types;

pub use actions::SessionAction;
pub use config::SessionConfig;
pub use environment::SessionEnvironment;
pub use error::{Result, SessionError};
pub use intent::{IntendedAction, IntentKind, IntentStore, JsonFileIntentStore, MemoryIntentStore};
pub use providers::{AuthProvider, ModeRepository};
pub use reducer::SessionReducer;
pub use role::RoleSelector;
pub use state::{BootstrapPhase, SessionState};
pub use store::SessionStore;
pub use types::{Mode, Profile, Role, TokenFingerprint, UserId};
