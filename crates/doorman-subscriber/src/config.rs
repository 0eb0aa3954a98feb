//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the polling HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSubscriberConfig {
    /// Milliseconds between polls of the status URL.
    pub poll_interval_ms: u64,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for HttpSubscriberConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 5_000, request_timeout_ms: 10_000 }
    }
}

impl HttpSubscriberConfig {
    /// The poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
