// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! The bucket-assignment engine.

use std::sync::Arc;

use arc_swap::ArcSwap;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};

use doorman_core::{probability, DistributionUpdate, Error, Probability, Result, UpdateHandler, EPSILON};

use crate::hash;

/// Number of bytes a doorman identifier must decode to.
const ID_LEN: usize = 16;

/// The distribution in force at a point in time. Immutable once published;
/// updates install a whole new snapshot.
#[derive(Debug)]
struct Snapshot {
    version: i64,
    probabilities: Vec<Probability>,
}

/// A doorman deterministically assigns identifiers to outcome buckets
/// according to its current probability distribution, and accepts live
/// distribution replacements from update transports.
///
/// Readers load an immutable snapshot atomically, so an assignment never
/// observes a distribution mid-replacement. A writer mutex serializes
/// concurrent updates.
#[derive(Debug)]
pub struct Doorman {
    id: String,
    state: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl Doorman {
    /// Creates a doorman with the given identifier and initial distribution,
    /// starting at version 0.
    ///
    /// The initial distribution is deliberately not validated: a placeholder
    /// doorman with an empty vector is legal and becomes usable once its
    /// first update arrives. Call [`validate`](Self::validate) before routing
    /// production decisions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is not the base64-url
    /// encoding of exactly 16 bytes.
    pub fn new(id: &str, probabilities: Vec<Probability>) -> Result<Self> {
        Self::new_at(id, probabilities, 0)
    }

    /// Like [`new`](Self::new), with a caller-supplied initial version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is malformed.
    pub fn new_at(id: &str, probabilities: Vec<Probability>, version: i64) -> Result<Self> {
        let decoded = URL_SAFE
            .decode(id)
            .map_err(|e| Error::InvalidIdentifier(e.to_string()))?;
        if decoded.len() != ID_LEN {
            return Err(Error::InvalidIdentifier(format!(
                "decodes to {} bytes, want {ID_LEN}",
                decoded.len()
            )));
        }
        Ok(Self {
            id: id.to_string(),
            state: ArcSwap::from_pointee(Snapshot { version, probabilities }),
            writer: Mutex::new(()),
        })
    }

    /// The identifier this doorman answers to.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The version of the distribution currently in force.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.state.load().version
    }

    /// Number of outcome buckets in the current distribution.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.load().probabilities.len()
    }

    /// Whether the doorman is still uninitialized (no distribution set).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the current probability vector.
    #[must_use]
    pub fn probabilities(&self) -> Vec<Probability> {
        self.state.load().probabilities.clone()
    }

    /// Checks that the current distribution is usable for assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if no distribution has been set, or
    /// [`Error::InvalidDistribution`] if it does not sum to one within
    /// tolerance.
    pub fn validate(&self) -> Result<()> {
        check_distribution(&self.state.load().probabilities)
    }

    /// Applies a candidate distribution update.
    ///
    /// Stale messages (`timestamp <= version`) are ignored and return `Ok`,
    /// which makes duplicate and out-of-order delivery from at-least-once
    /// transports safe. A rejected update never mutates any state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentifierMismatch`] if the message is addressed to a
    /// different doorman, or [`Error::InvalidDistribution`] if the candidate
    /// vector does not sum to one within tolerance.
    pub fn apply_update(&self, update: &DistributionUpdate) -> Result<()> {
        let _writer = self.writer.lock();

        let current = self.state.load();
        if update.timestamp <= current.version {
            debug!(
                id = %self.id,
                timestamp = update.timestamp,
                version = current.version,
                "ignoring stale distribution update"
            );
            return Ok(());
        }
        if update.id != self.id {
            return Err(Error::IdentifierMismatch {
                expected: self.id.clone(),
                received: update.id.clone(),
            });
        }
        check_distribution(&update.probabilities)?;

        self.state.store(Arc::new(Snapshot {
            version: update.timestamp,
            probabilities: update.probabilities.clone(),
        }));
        info!(
            id = %self.id,
            version = update.timestamp,
            buckets = update.probabilities.len(),
            "applied distribution update"
        );
        Ok(())
    }

    /// Returns the bucket whose cumulative probability range contains the
    /// given sample point in `[0, 1]`.
    ///
    /// Walks the cumulative sums in index order and returns the first index
    /// that reaches or exceeds the sample; the lower index wins on exact
    /// boundary equality.
    ///
    /// # Panics
    ///
    /// Panics if the sample lies above the vector's total by more than the
    /// validation tolerance. That state is unreachable through
    /// [`apply_update`](Self::apply_update); hitting it means an unvalidated
    /// distribution was installed at construction, a programming error.
    #[must_use]
    pub fn assign(&self, sample: f64) -> usize {
        let snapshot = self.state.load();
        let mut cumulative = 0.0;
        for (i, p) in snapshot.probabilities.iter().enumerate() {
            cumulative += p.value();
            if sample <= cumulative {
                return i;
            }
        }
        // A tolerance-accepted vector can fall short of 1.0 by rounding only;
        // absorb that sliver into the last bucket.
        if !snapshot.probabilities.is_empty() && sample <= cumulative + EPSILON {
            return snapshot.probabilities.len() - 1;
        }
        panic!("sample point {sample} above cumulative probability {cumulative}");
    }

    /// Deterministically assigns the concatenation of the given byte parts.
    ///
    /// Every process sharing this doorman's distribution computes the same
    /// bucket for the same input.
    #[must_use]
    pub fn assign_bytes(&self, parts: &[&[u8]]) -> usize {
        self.assign(hash::unit_fraction(hash::digest(parts)))
    }

    /// Deterministically assigns a string key. See
    /// [`assign_bytes`](Self::assign_bytes).
    #[must_use]
    pub fn assign_str(&self, key: &str) -> usize {
        self.assign_bytes(&[key.as_bytes()])
    }

    /// Assigns a bucket from a uniform pseudo-random sample.
    ///
    /// For simulation and testing only: draws are not reproducible, so this
    /// is unsuitable for production routing decisions.
    #[must_use]
    pub fn assign_random(&self) -> usize {
        self.assign(rand::thread_rng().gen::<f64>())
    }

    /// The callback handed to an update transport.
    #[must_use]
    pub fn update_handler(self: &Arc<Self>) -> UpdateHandler {
        let doorman = Arc::clone(self);
        Arc::new(move |update| doorman.apply_update(update))
    }
}

/// Validates a candidate probability vector.
fn check_distribution(weights: &[Probability]) -> Result<()> {
    if weights.is_empty() {
        return Err(Error::Uninitialized);
    }
    let total = probability::sum(weights);
    if weights.iter().any(|w| w.value() < 0.0) || !probability::sums_to_one(total) {
        return Err(Error::InvalidDistribution { sum: total });
    }
    Ok(())
}
