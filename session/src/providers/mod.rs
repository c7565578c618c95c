//! Provider traits the session bootstrap depends on.
//!
//! The auth collaborator and the profile storage are external systems; the
//! bootstrap only needs these two seams. Token-exchange mechanics live
//! entirely behind [`AuthProvider`].

use std::future::Future;

use crate::error::Result;
use crate::types::{Mode, Profile, UserId};

/// Exchange of an opaque session token for a user profile.
pub trait AuthProvider: Send + Sync {
    /// Resolve `token` to the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SessionError::AuthenticationFailed`] when the
    /// token is invalid, expired, or the collaborator is unreachable.
    fn fetch_profile(&self, token: &str) -> impl Future<Output = Result<Profile>> + Send;
}

/// Persistence of the mode field on a profile.
pub trait ModeRepository: Send + Sync {
    /// Write `mode` on the user's profile and return the updated profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SessionError::NotFound`] if the user does not
    /// exist.
    fn set_mode(&self, user_id: UserId, mode: Mode) -> impl Future<Output = Result<Profile>> + Send;
}
