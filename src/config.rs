//! Engine configuration
//!
//! [`EngineConfig`] carries everything the executor and transport need:
//! the concurrency cap for a wave, the retry policy, and the headers
//! attached to every request.

use crate::auth::Credentials;
use crate::types::StringMap;
use std::time::Duration;

/// Default concurrency cap for one wave of requests
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Configuration for the fetch engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of requests in flight at once
    pub concurrency_limit: usize,
    /// Retry ceiling for transient failures. `None` retries without bound,
    /// which matches endpoints that eventually recover but will loop
    /// forever against one that never does.
    pub max_retries: Option<u32>,
    /// One backoff unit; the Nth consecutive retry of a request sleeps
    /// N² units before resubmitting
    pub backoff_unit: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers attached to every request (precomputed auth lands here)
    pub default_headers: StringMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY,
            max_retries: None,
            backoff_unit: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            user_agent: format!("pagewave/{}", env!("CARGO_PKG_VERSION")),
            default_headers: StringMap::new(),
        }
    }
}

impl EngineConfig {
    /// Create a new config builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for engine config
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the concurrency cap (values below 1 are clamped to 1)
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.config.concurrency_limit = limit.max(1);
        self
    }

    /// Set a retry ceiling; the default is unbounded retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = Some(retries);
        self
    }

    /// Set the backoff unit (the Nth retry sleeps N² units)
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.config.backoff_unit = unit;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .insert(name.into(), value.into());
        self
    }

    /// Merge the headers produced by a credential set
    pub fn credentials(mut self, credentials: &Credentials) -> Self {
        self.config.default_headers.extend(credentials.headers());
        self
    }

    /// Build the config
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
