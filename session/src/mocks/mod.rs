//! Mock providers for tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{Result, SessionError};
use crate::providers::{AuthProvider, ModeRepository};
use crate::types::{Mode, Profile, UserId};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Mock auth provider backed by a token → profile map.
///
/// Counts fetches so duplicate-suppression tests can assert exactly one
/// exchange happened.
#[derive(Clone, Default)]
pub struct MockAuthProvider {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    fetch_count: Arc<Mutex<usize>>,
}

impl MockAuthProvider {
    /// Create an empty mock; every fetch fails until tokens are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `profile` as the result for `token`.
    #[must_use]
    pub fn with_profile(self, token: impl Into<String>, profile: Profile) -> Self {
        lock(&self.profiles).insert(token.into(), profile);
        self
    }

    /// How many fetches have been attempted.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        *lock(&self.fetch_count)
    }
}

impl AuthProvider for MockAuthProvider {
    fn fetch_profile(&self, token: &str) -> impl Future<Output = Result<Profile>> + Send {
        let profiles = Arc::clone(&self.profiles);
        let fetch_count = Arc::clone(&self.fetch_count);
        let token = token.to_string();
        async move {
            *lock(&fetch_count) += 1;
            lock(&profiles)
                .get(&token)
                .cloned()
                .ok_or(SessionError::AuthenticationFailed {
                    reason: "unknown token".to_string(),
                })
        }
    }
}

/// Mock mode repository backed by a user → profile map.
///
/// Counts writes so idempotency tests can assert that re-selecting the
/// same mode performs none.
#[derive(Clone, Default)]
pub struct MockModeRepository {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    write_count: Arc<Mutex<usize>>,
    fail_writes: bool,
}

impl MockModeRepository {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored profile.
    #[must_use]
    pub fn with_profile(self, profile: Profile) -> Self {
        lock(&self.profiles).insert(profile.user_id, profile);
        self
    }

    /// Make every write fail with `NotFound`.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// How many mode writes have been performed.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *lock(&self.write_count)
    }
}

impl ModeRepository for MockModeRepository {
    fn set_mode(&self, user_id: UserId, mode: Mode) -> impl Future<Output = Result<Profile>> + Send {
        let profiles = Arc::clone(&self.profiles);
        let write_count = Arc::clone(&self.write_count);
        let fail_writes = self.fail_writes;
        async move {
            if fail_writes {
                return Err(SessionError::NotFound);
            }
            let mut profiles = lock(&profiles);
            let profile = profiles.get_mut(&user_id).ok_or(SessionError::NotFound)?;
            profile.mode = Some(mode);
            *lock(&write_count) += 1;
            Ok(profile.clone())
        }
    }
}

/// A profile without a mode, for bootstrap tests.
#[must_use]
pub fn profile_without_mode() -> Profile {
    Profile {
        user_id: UserId::new(),
        display_name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role: crate::types::Role::Ordinary,
        mode: None,
    }
}
