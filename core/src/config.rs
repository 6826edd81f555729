//! Client configuration resolved once at startup.
//!
//! Nothing here reads the environment: the base URL is compiled in and can
//! be overridden explicitly by the embedding app (or a test pointing at the
//! mock server).

use crate::retry::RetryPolicy;

/// Backend the app talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/finder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
