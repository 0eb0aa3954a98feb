// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for update transports.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, SubscriberError>;

/// Errors that can occur while setting up or running a transport.
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// The HTTP request itself failed (connection, timeout, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected http status {status} from {url}")]
    Status {
        /// The status code received.
        status: u16,
        /// The URL that was queried.
        url: String,
    },

    /// An inbound payload was not a valid update message.
    #[error("failed to decode update message: {0}")]
    Decode(#[from] serde_json::Error),

    /// The queue subscriber's frame channel was already taken.
    #[error("queue subscriber already started")]
    AlreadySubscribed,

    /// The doorman rejected an update during transport setup.
    #[error(transparent)]
    Engine(#[from] doorman_core::Error),
}
