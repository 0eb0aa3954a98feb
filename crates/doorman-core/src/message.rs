// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! The wire-level update message and the callback contract transports use to
//! deliver it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::probability::Probability;

/// A candidate distribution replacement, as delivered by a transport.
///
/// Field names are fixed for interoperability with doorman servers in other
/// languages. `timestamp` serves as the monotonic version: the engine ignores
/// any message whose timestamp does not advance its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionUpdate {
    /// The doorman the message is addressed to.
    pub id: String,
    /// Monotonic version of the distribution.
    pub timestamp: i64,
    /// The replacement probability vector, index i being outcome i.
    pub probabilities: Vec<Probability>,
}

/// Callback a transport invokes once per received, successfully decoded
/// update message.
///
/// Transports log a returned error but never retry it: a validation failure
/// means the message itself was malformed, not a transient condition.
pub type UpdateHandler = Arc<dyn Fn(&DistributionUpdate) -> Result<()> + Send + Sync>;
