// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic hashing for bucket assignment.
//!
//! Two doorman processes that never talk to each other must compute the same
//! bucket for the same identifier, so the hash must be:
//! - Deterministic across processes, platforms, and languages
//! - Uniform: output spread evenly over the unit interval
//! - Fast: computed for every assignment decision
//!
//! SipHash-2-4 with a fixed all-zero key satisfies all three. The key is
//! deliberately constant — a per-process random key would break cross-process
//! agreement, which is the entire point.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

/// Fixed 128-bit SipHash key, shared by every doorman deployment.
const SIP_KEY: (u64, u64) = (0, 0);

/// `1 / 2^64`, the weight of the most-significant fraction digit's successor.
const ULP_64: f64 = 1.0 / 18_446_744_073_709_551_616.0;

/// Computes the 64-bit digest of the concatenation of the given byte parts.
///
/// Part boundaries are not delimited: `digest(&[b"ab", b"c"])` equals
/// `digest(&[b"a", b"bc"])`.
#[must_use]
pub fn digest(parts: &[&[u8]]) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(SIP_KEY.0, SIP_KEY.1);
    for part in parts {
        hasher.write(part);
    }
    hasher.finish()
}

/// Maps a digest onto the unit interval.
///
/// The digest's bits are read least-significant first as successive binary
/// fraction digits: `value = Σ bit_i · 2^-(i+1)`. The bit order is a protocol
/// constant; existing deployments depend on it.
///
/// The all-ones digest is mathematically `1 − 2^-64`, which rounds to exactly
/// `1.0` at `f64` precision. Every other digest maps strictly below one.
#[inline]
#[must_use]
pub fn unit_fraction(digest: u64) -> f64 {
    (digest.reverse_bits() as f64) * ULP_64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_pinned() {
        // Regression constant shared with every doorman implementation.
        assert_eq!(digest(&[b"doormen are great"]), 0x3973fc1b3e324215);
    }

    #[test]
    fn digest_concatenates_without_delimiters() {
        assert_eq!(digest(&[b"ab", b"c"]), digest(&[b"a", b"bc"]));
        assert_eq!(digest(&[b"abc"]), digest(&[b"a", b"b", b"c"]));
        assert_ne!(digest(&[b"abc"]), digest(&[b"acb"]));
    }

    #[test]
    fn unit_fraction_reads_bits_least_significant_first() {
        assert_eq!(unit_fraction(0), 0.0);
        assert_eq!(unit_fraction(1), 0.5);
        // 5 = 0b101: 1/2 + 1/8
        assert_eq!(unit_fraction(5), 0.625);
        assert_eq!(unit_fraction(2), 0.25);
    }

    #[test]
    fn unit_fraction_all_ones_rounds_to_one() {
        // 1 - 2^-64 is below f64 resolution next to 1.0.
        assert_eq!(unit_fraction(u64::MAX), 1.0);
    }

    #[test]
    fn unit_fraction_stays_in_range() {
        for digest in [0, 1, 2, 0xdead_beef, u64::MAX / 2, u64::MAX - 1, u64::MAX] {
            let value = unit_fraction(digest);
            assert!((0.0..=1.0).contains(&value), "{digest} mapped to {value}");
        }
    }
}
