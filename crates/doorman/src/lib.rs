//! Deterministic probability-bucket assignment with live distribution
//! updates.
//!
//! A [`Doorman`] maps an identifier (a user id, request key, any byte string)
//! to one of N outcome buckets according to a probability distribution. The
//! mapping is deterministic: the same identifier lands in the same bucket on
//! every call, in every process, as long as the distribution is unchanged.
//! The distribution can be replaced live through
//! [`apply_update`](Doorman::apply_update), typically driven by a transport
//! from the `doorman-subscriber` crate; readers never observe a
//! half-replaced distribution.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use doorman::{Doorman, Probability};
//!
//! let doorman = Doorman::new(
//!     "zST8_FWcPDT2-14wDQAAAQ==",
//!     vec![
//!         Probability::new(0.25),
//!         Probability::new(0.5),
//!         Probability::new(0.25),
//!     ],
//! )?;
//! doorman.validate()?;
//!
//! let bucket = doorman.assign_str("user-42");
//! assert!(bucket < 3);
//! // same key, same bucket, every time
//! assert_eq!(doorman.assign_str("user-42"), bucket);
//!
//! // transports call the engine back through this handler
//! let doorman = Arc::new(doorman);
//! let _handler = doorman.update_handler();
//! # Ok::<(), doorman::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod hash;

pub use engine::Doorman;

pub use doorman_core::{DistributionUpdate, Error, Probability, Result, UpdateHandler};
