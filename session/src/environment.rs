//! Environment for the session bootstrap reducer.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::intent::IntentStore;
use crate::providers::{AuthProvider, ModeRepository};
use crate::role::RoleSelector;

/// Dependencies the bootstrap reducer needs to produce its effects.
///
/// Generic over the concrete providers so production and tests compose
/// the same reducer with different implementations.
#[derive(Clone)]
pub struct SessionEnvironment<A, M>
where
    A: AuthProvider + Clone,
    M: ModeRepository + Clone,
{
    /// Token-to-profile exchange
    pub auth: A,
    /// First-time role selection
    pub roles: RoleSelector<M>,
    /// The pending intended action
    pub intents: Arc<dyn IntentStore>,
    /// Bootstrap policy knobs
    pub config: SessionConfig,
}

impl<A, M> SessionEnvironment<A, M>
where
    A: AuthProvider + Clone,
    M: ModeRepository + Clone,
{
    /// Assemble an environment.
    pub fn new(auth: A, modes: M, intents: Arc<dyn IntentStore>, config: SessionConfig) -> Self {
        Self {
            auth,
            roles: RoleSelector::new(modes),
            intents,
            config,
        }
    }
}
