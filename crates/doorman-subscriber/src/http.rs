// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP polling transport.

use async_trait::async_trait;
use tracing::warn;

use doorman_core::{DistributionUpdate, UpdateHandler};

use crate::config::HttpSubscriberConfig;
use crate::error::{Result, SubscriberError};
use crate::Subscriber;

/// Polls a doorman status URL on a fixed interval and forwards each decoded
/// update to the engine.
#[derive(Debug, Clone)]
pub struct HttpSubscriber {
    url: String,
    config: HttpSubscriberConfig,
    client: reqwest::Client,
}

impl HttpSubscriber {
    /// Creates a subscriber polling `url` with the default configuration.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, HttpSubscriberConfig::default())
    }

    /// Creates a subscriber polling `url` with the given configuration.
    #[must_use]
    pub fn with_config(url: impl Into<String>, config: HttpSubscriberConfig) -> Self {
        Self { url: url.into(), config, client: reqwest::Client::new() }
    }

    /// The URL this subscriber polls.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and decodes a single update message from the status URL.
    ///
    /// Also used by discovery to set a doorman's initial state before the
    /// background loop starts.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a non-success status, or an
    /// undecodable body.
    pub async fn fetch(&self) -> Result<DistributionUpdate> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SubscriberError::Status {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Subscriber for HttpSubscriber {
    async fn subscribe(&self, doorman_id: &str, update: UpdateHandler) -> Result<()> {
        let poller = self.clone();
        let id = doorman_id.to_string();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.config.poll_interval());
            loop {
                ticker.tick().await;
                match poller.fetch().await {
                    Ok(message) => {
                        if let Err(err) = update(&message) {
                            warn!(id = %id, error = %err, "doorman rejected polled update");
                        }
                    }
                    Err(err) => {
                        warn!(id = %id, url = %poller.url, error = %err, "failed to poll distribution update");
                    }
                }
            }
        });
        Ok(())
    }
}
