//! Session bootstrap state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Profile, TokenFingerprint};

/// Where the bootstrap currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapPhase {
    /// No authenticated user
    #[default]
    Anonymous,
    /// Token received, profile fetch in flight
    Authenticating,
    /// Authenticated but no marketplace mode chosen yet
    AuthenticatedNoMode,
    /// Authenticated with a mode; the session is usable
    AuthenticatedReady,
}

/// State of one browser session's bootstrap.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Current bootstrap phase
    pub phase: BootstrapPhase,
    /// The authenticated profile, once fetched
    pub profile: Option<Profile>,
    /// Fingerprints of tokens already handled; a repeated callback with a
    /// known token fires no second profile fetch
    pub processed_tokens: HashSet<TokenFingerprint>,
    /// Where the interface layer should navigate next, if anywhere
    pub navigation: Option<String>,
    /// Last bootstrap error, surfaced to the interface layer
    pub last_error: Option<String>,
}

impl SessionState {
    /// Fresh anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an authenticated profile is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(
            self.phase,
            BootstrapPhase::AuthenticatedNoMode | BootstrapPhase::AuthenticatedReady
        )
    }

    /// Take the pending navigation target, clearing it.
    pub fn take_navigation(&mut self) -> Option<String> {
        self.navigation.take()
    }
}
