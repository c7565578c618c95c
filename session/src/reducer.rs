//! The session bootstrap reducer.
//!
//! Drives a session from `Anonymous` through authentication and optional
//! first-time role selection to `AuthenticatedReady`, resuming the parked
//! intended action along the way:
//!
//! ```text
//! TokenReceived ── fetch profile ──> ProfileFetched ── read intent ──>
//! IntentChecked ──(mode missing)──> set_mode ──> ModeAssigned
//!               ──(mode present)──> navigate
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};
use tripmarket_core::{Effect, Reducer, SmallVec, smallvec};

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::providers::{AuthProvider, ModeRepository};
use crate::state::{BootstrapPhase, SessionState};
use crate::types::TokenFingerprint;

/// Reducer implementing the session bootstrap state machine.
pub struct SessionReducer<A, M> {
    _marker: PhantomData<(A, M)>,
}

impl<A, M> SessionReducer<A, M> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<A, M> Default for SessionReducer<A, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, M> Reducer for SessionReducer<A, M>
where
    A: AuthProvider + Clone + Send + Sync + 'static,
    M: ModeRepository + Clone + Send + Sync + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<A, M>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::TokenReceived { token } => {
                let fingerprint = TokenFingerprint::of(&token);
                if !state.processed_tokens.insert(fingerprint) {
                    // Repeated callback with the same token: at most one
                    // profile fetch per token.
                    debug!("duplicate token callback suppressed");
                    return smallvec![];
                }

                state.phase = BootstrapPhase::Authenticating;
                state.last_error = None;
                let auth = env.auth.clone();
                smallvec![Effect::future(async move {
                    match auth.fetch_profile(&token).await {
                        Ok(profile) => Some(SessionAction::ProfileFetched { profile }),
                        Err(error) => Some(SessionAction::ProfileFetchFailed {
                            error: error.to_string(),
                        }),
                    }
                })]
            }

            SessionAction::ProfileFetched { profile } => {
                state.phase = if profile.mode.is_some() {
                    BootstrapPhase::AuthenticatedReady
                } else {
                    BootstrapPhase::AuthenticatedNoMode
                };
                debug!(user_id = %profile.user_id, phase = ?state.phase, "profile fetched");
                state.profile = Some(profile);
                state.last_error = None;

                let intents = Arc::clone(&env.intents);
                smallvec![Effect::future(async move {
                    Some(SessionAction::IntentChecked {
                        intent: intents.get(),
                        fresh: true,
                    })
                })]
            }

            SessionAction::ProfileFetchFailed { error } => {
                warn!(%error, "profile fetch failed, back to anonymous");
                state.phase = BootstrapPhase::Anonymous;
                state.profile = None;
                state.last_error = Some(error);
                // The parked intent stays for the next attempt.
                smallvec![]
            }

            SessionAction::ResumeVisit => {
                // Revisit resumption is only for fully bootstrapped
                // sessions: a mode-less user must go through role
                // selection, never straight into a mode-gated flow.
                if state.phase != BootstrapPhase::AuthenticatedReady {
                    return smallvec![];
                }
                let intents = Arc::clone(&env.intents);
                smallvec![Effect::future(async move {
                    Some(SessionAction::IntentChecked {
                        intent: intents.get(),
                        fresh: false,
                    })
                })]
            }

            SessionAction::IntentChecked { intent, fresh } => {
                let Some(profile) = state.profile.clone() else {
                    return smallvec![];
                };

                match intent {
                    Some(intent) => {
                        let needs_mode = fresh && profile.mode != Some(intent.mode);
                        let intents = Arc::clone(&env.intents);

                        if needs_mode {
                            debug!(kind = ?intent.kind, mode = %intent.mode, "resuming intent via role selection");
                            let roles = env.roles.clone();
                            smallvec![Effect::future(async move {
                                let outcome = roles.set_mode(&profile, intent.mode).await;
                                // Resolved or not, the intent is spent.
                                intents.clear();
                                match outcome {
                                    Ok(profile) => Some(SessionAction::ModeAssigned {
                                        profile,
                                        redirect_url: intent.redirect_url,
                                    }),
                                    Err(error) => Some(SessionAction::ModeAssignmentFailed {
                                        error: error.to_string(),
                                    }),
                                }
                            })]
                        } else {
                            debug!(kind = ?intent.kind, "resuming intent without touching mode");
                            state.navigation = Some(intent.redirect_url);
                            smallvec![Effect::future(async move {
                                intents.clear();
                                None
                            })]
                        }
                    }
                    None => {
                        if profile.mode.is_some() {
                            state.navigation = Some(env.config.default_landing_url.clone());
                        }
                        smallvec![]
                    }
                }
            }

            SessionAction::ModeAssigned {
                profile,
                redirect_url,
            } => {
                debug!(user_id = %profile.user_id, "mode assigned, session ready");
                state.profile = Some(profile);
                state.phase = BootstrapPhase::AuthenticatedReady;
                state.navigation = Some(redirect_url);
                state.last_error = None;
                smallvec![]
            }

            SessionAction::ModeAssignmentFailed { error } => {
                warn!(%error, "mode assignment failed");
                state.phase = BootstrapPhase::AuthenticatedNoMode;
                state.last_error = Some(error);
                smallvec![]
            }
        }
    }
}
