//! # Tripmarket Core
//!
//! Core traits and types for the Tripmarket booking platform.
//!
//! This crate provides the fundamental abstractions shared by the domain
//! crates: the `Reducer` pattern used by the session bootstrap state machine,
//! the `Effect` value type describing side effects without executing them,
//! and the `Clock` trait that keeps every time read injectable.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → Effects`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment

pub mod effect;
pub mod environment;
pub mod reducer;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use environment::{Clock, SystemClock};
pub use reducer::Reducer;
