//! Session configuration.

use chrono::Duration;

/// Configuration for session bootstrap and intent resumption.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a saved intent stays fresh.
    ///
    /// An intent older than this is treated as absent and removed on the
    /// next read. Default: 30 minutes
    pub intent_ttl: Duration,

    /// Where a mode-holding user lands when no intent is pending.
    ///
    /// Default: `/dashboard`
    pub default_landing_url: String,
}

impl SessionConfig {
    /// Create the default session configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intent_ttl: Duration::minutes(30),
            default_landing_url: "/dashboard".to_string(),
        }
    }

    /// Set the intent time-to-live.
    #[must_use]
    pub const fn with_intent_ttl(mut self, ttl: Duration) -> Self {
        self.intent_ttl = ttl;
        self
    }

    /// Set the default landing URL.
    #[must_use]
    pub fn with_default_landing_url(mut self, url: impl Into<String>) -> Self {
        self.default_landing_url = url.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.intent_ttl, Duration::minutes(30));
        assert_eq!(config.default_landing_url, "/dashboard");
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_intent_ttl(Duration::minutes(5))
            .with_default_landing_url("/home");
        assert_eq!(config.intent_ttl, Duration::minutes(5));
        assert_eq!(config.default_landing_url, "/home");
    }
}
