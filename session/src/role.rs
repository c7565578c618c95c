//! First-time role selection.

use std::str::FromStr;

use tracing::debug;

use crate::error::Result;
use crate::providers::ModeRepository;
use crate::types::{Mode, Profile};

/// Applies a marketplace mode to a profile.
///
/// Mode is a singleton: once set it is never reset here, and re-selecting
/// the current mode performs no write. A duplicate write reaching the
/// repository anyway must be tolerated by the backend (same value, no
/// observable change).
#[derive(Clone)]
pub struct RoleSelector<M> {
    modes: M,
}

impl<M> RoleSelector<M>
where
    M: ModeRepository,
{
    /// Create a selector over the given repository.
    pub const fn new(modes: M) -> Self {
        Self { modes }
    }

    /// Set `mode` on the profile, skipping the write when it already
    /// holds that mode.
    ///
    /// # Errors
    ///
    /// Returns the repository's error when the persist fails.
    pub async fn set_mode(&self, profile: &Profile, mode: Mode) -> Result<Profile> {
        if profile.mode == Some(mode) {
            debug!(user_id = %profile.user_id, %mode, "mode already set, skipping write");
            return Ok(profile.clone());
        }
        self.modes.set_mode(profile.user_id, mode).await
    }

    /// Parse a raw mode string and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SessionError::Validation`] for an unknown mode
    /// string, otherwise whatever [`Self::set_mode`] returns.
    pub async fn set_mode_str(&self, profile: &Profile, raw: &str) -> Result<Profile> {
        let mode = Mode::from_str(raw)?;
        self.set_mode(profile, mode).await
    }
}
