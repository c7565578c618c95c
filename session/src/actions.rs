//! Actions driving the session bootstrap reducer.

use crate::intent::IntendedAction;
use crate::types::Profile;

/// Everything that can happen during session bootstrap.
///
/// The first two variants arrive from the outside (auth callback, page
/// visit); the rest are produced by effect execution and fed back in.
#[derive(Clone, Debug)]
pub enum SessionAction {
    /// The auth callback delivered a session token
    TokenReceived {
        /// Opaque token from the auth collaborator
        token: String,
    },

    /// A later visit with no new token; the session may still hold an
    /// intent to resume
    ResumeVisit,

    /// The auth provider resolved the token to a profile
    ProfileFetched {
        /// The authenticated user's profile
        profile: Profile,
    },

    /// The auth provider could not resolve the token
    ProfileFetchFailed {
        /// Why the exchange failed
        error: String,
    },

    /// The intent store was consulted
    IntentChecked {
        /// The pending intent, if present and fresh
        intent: Option<IntendedAction>,
        /// Whether this is the fresh pass right after authentication
        /// (`false` on a revisit)
        fresh: bool,
    },

    /// The role selector applied the intent's mode
    ModeAssigned {
        /// The updated profile
        profile: Profile,
        /// Where to navigate now
        redirect_url: String,
    },

    /// The role selector could not apply the intent's mode
    ModeAssignmentFailed {
        /// Why the assignment failed
        error: String,
    },
}
