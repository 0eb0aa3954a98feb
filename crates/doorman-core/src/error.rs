// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for doorman operations.

use thiserror::Error;

/// A specialized `Result` type for doorman operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing, validating, or updating a
/// doorman.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The identifier is not the base64-url encoding of a 16 byte array.
    #[error("identifier must be base64-url encoded 16 bytes: {0}")]
    InvalidIdentifier(String),

    /// No distribution has been set yet. Recoverable: await the first update.
    #[error("no probability distribution has been set")]
    Uninitialized,

    /// A candidate distribution does not sum to one within tolerance, or
    /// carries a negative weight. The previous distribution stays in force.
    #[error("probabilities must sum to one, got {sum}")]
    InvalidDistribution {
        /// The sum the rejected candidate actually had.
        sum: f64,
    },

    /// An update message was addressed to a different doorman. Indicates
    /// transport misrouting; the engine is left unchanged.
    #[error("update addressed to doorman {received} but this doorman is {expected}")]
    IdentifierMismatch {
        /// The identifier of the engine that received the message.
        expected: String,
        /// The identifier the message was addressed to.
        received: String,
    },
}
