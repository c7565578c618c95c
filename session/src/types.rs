//! Profile and identity types for the session crate.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::SessionError;

/// Unique identifier for a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform role of a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular marketplace participant
    Ordinary,
    /// Moderation and administration rights
    Administrator,
}

/// Marketplace mode a user operates in.
///
/// Chosen once after first sign-in; re-selecting the same mode is a no-op
/// and the role selector never resets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Looking for trips and rentals
    Seeker,
    /// Offering trips and vehicles
    Provider,
}

impl Mode {
    /// Stable string form, matching the serde representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seeker => "seeker",
            Self::Provider => "provider",
        }
    }
}

impl FromStr for Mode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seeker" => Ok(Self::Seeker),
            "provider" => Ok(Self::Provider),
            other => Err(SessionError::Validation {
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User profile as delivered by the auth collaborator.
///
/// `mode` is mutated only through the role selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User identifier
    pub user_id: UserId,
    /// Display name
    pub display_name: String,
    /// Email address
    pub email: String,
    /// Platform role
    pub role: Role,
    /// Marketplace mode, unset until first role selection
    pub mode: Option<Mode>,
}

/// Stable SHA-256 fingerprint of a bearer token.
///
/// Recorded in the session state so a duplicate token callback never fires
/// a second profile fetch. The raw token itself is never stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Fingerprint a raw token
    #[must_use]
    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        Self(base64::engine::general_purpose::STANDARD_NO_PAD.encode(digest))
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("seeker".parse::<Mode>(), Ok(Mode::Seeker));
        assert_eq!("provider".parse::<Mode>(), Ok(Mode::Provider));

        let err = "pilot".parse::<Mode>().unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_mode_round_trips_through_display() {
        for mode in [Mode::Seeker, Mode::Provider] {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn test_fingerprint_is_stable_and_discriminating() {
        let a = TokenFingerprint::of("token-one");
        let b = TokenFingerprint::of("token-one");
        let c = TokenFingerprint::of("token-two");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fingerprint_does_not_leak_the_token() {
        let fp = TokenFingerprint::of("super-secret");
        assert!(!fp.to_string().contains("super-secret"));
    }
}
