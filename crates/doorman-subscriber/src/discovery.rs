//! Transport discovery against a doorman server.
//!
//! A doorman server advertises which delivery medium it serves updates over.
//! The discovery subscriber performs that lookup once, seeds the engine with
//! the server's current distribution, and then subscribes through the
//! advertised transport, falling back to HTTP polling when the advertisement
//! is absent or unsupported.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use doorman_core::UpdateHandler;

use crate::config::HttpSubscriberConfig;
use crate::error::{Result, SubscriberError};
use crate::http::HttpSubscriber;
use crate::Subscriber;

/// What a doorman server advertises about itself at `/api/server`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSpec {
    /// Host the server answers on.
    pub hostname: String,
    /// Port the server answers on.
    pub port: u16,
    /// Name of the update medium the server pushes over, empty for plain
    /// HTTP polling.
    pub message_queue: String,
}

/// Discovers a doorman server's transport, sets the engine's initial state,
/// and subscribes through the advertised medium.
#[derive(Debug, Clone)]
pub struct DiscoverySubscriber {
    base_url: String,
    config: HttpSubscriberConfig,
    client: reqwest::Client,
}

impl DiscoverySubscriber {
    /// Creates a discovery subscriber for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, HttpSubscriberConfig::default())
    }

    /// Creates a discovery subscriber with a custom polling configuration.
    #[must_use]
    pub fn with_config(base_url: impl Into<String>, config: HttpSubscriberConfig) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, config, client: reqwest::Client::new() }
    }

    /// Fetches the server's self-description.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a non-success status, or an
    /// undecodable body.
    pub async fn server_spec(&self) -> Result<ServerSpec> {
        let url = format!("{}/api/server", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SubscriberError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// The status URL updates for `doorman_id` are served from.
    #[must_use]
    pub fn status_url(&self, doorman_id: &str) -> String {
        format!("{}/api/doormen/{doorman_id}/status", self.base_url)
    }

    /// Seeds the engine with the server's current distribution, so a fresh
    /// process does not route on a placeholder until the first delivery.
    async fn set_initial_state(&self, doorman_id: &str, update: &UpdateHandler) -> Result<()> {
        let poller = HttpSubscriber::with_config(self.status_url(doorman_id), self.config.clone());
        let message = poller.fetch().await?;
        update(&message)?;
        Ok(())
    }
}

#[async_trait]
impl Subscriber for DiscoverySubscriber {
    async fn subscribe(&self, doorman_id: &str, update: UpdateHandler) -> Result<()> {
        let spec = self.server_spec().await?;
        self.set_initial_state(doorman_id, &update).await?;

        if !spec.message_queue.is_empty() && spec.message_queue != "http" {
            warn!(
                id = %doorman_id,
                transport = %spec.message_queue,
                "server advertises an unsupported transport, falling back to http polling"
            );
        }
        let poller = HttpSubscriber::with_config(self.status_url(doorman_id), self.config.clone());
        poller.subscribe(doorman_id, update).await
    }
}
