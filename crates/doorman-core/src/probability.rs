//! Probability weights and the tolerance rules used to validate them.
//!
//! Weights are bounded-precision floating values. Exact-arithmetic senders
//! serialize probabilities as rational strings (`"1/3"`); those are accepted
//! on the wire and converted on ingestion, so the tolerance below absorbs
//! both float rounding and rational-to-float conversion.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Tolerance for the sum-to-one check.
///
/// Chosen to absorb floating rounding while still rejecting real
/// misconfiguration: a vector summing to 0.9999998 is rejected, one summing
/// to 0.9999999991 is accepted.
pub const EPSILON: f64 = 1e-9;

/// A single bucket weight.
///
/// Serializes as a JSON number; deserializes from a JSON number or a rational
/// string such as `"1/4"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Creates a probability from a float value.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the weight as a float.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Probability {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing a probability literal.
#[derive(Debug, Error)]
#[error("invalid probability literal: {0:?}")]
pub struct ParseProbabilityError(String);

impl FromStr for Probability {
    type Err = ParseProbabilityError;

    /// Parses either a plain decimal (`"0.25"`) or a rational (`"1/4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseProbabilityError(s.to_string());
        match s.split_once('/') {
            Some((numerator, denominator)) => {
                let n: f64 = numerator.trim().parse().map_err(|_| bad())?;
                let d: f64 = denominator.trim().parse().map_err(|_| bad())?;
                if d == 0.0 {
                    return Err(bad());
                }
                Ok(Self(n / d))
            }
            None => s.trim().parse().map(Self).map_err(|_| bad()),
        }
    }
}

impl Serialize for Probability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Literal(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(Self(value)),
            Repr::Literal(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Sums a weight sequence by repeated addition in sequence order.
#[must_use]
pub fn sum(weights: &[Probability]) -> f64 {
    weights.iter().fold(0.0, |total, w| total + w.0)
}

/// Whether a weight total counts as one under the tolerance rule.
#[must_use]
pub fn sums_to_one(total: f64) -> bool {
    (total - 1.0).abs() <= EPSILON
}
