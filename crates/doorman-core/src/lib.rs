//! Core types shared across the doorman components.
//!
//! This crate provides the building blocks used by the assignment engine and
//! the update transports:
//! - Probability weights and the tolerance rules for validating a distribution
//! - The wire-level update message exchanged with doorman servers
//! - The error taxonomy

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod probability;

pub use error::{Error, Result};
pub use message::{DistributionUpdate, UpdateHandler};
pub use probability::{Probability, EPSILON};
