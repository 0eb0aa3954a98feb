//! Update transports for the doorman assignment engine.
//!
//! A transport delivers `{id, timestamp, probabilities}` messages from
//! outside the process to a doorman's update callback, by whatever medium:
//!
//! - [`HttpSubscriber`] polls a status URL on a fixed interval.
//! - [`QueueSubscriber`] consumes raw payload frames from any queue or
//!   pub/sub client through a channel.
//! - [`DiscoverySubscriber`] asks a doorman server which transport to use,
//!   sets the engine's initial state, and subscribes through it.
//!
//! All transports share the same contract: delivery is at-least-once and
//! possibly out of order (the engine's version check makes that safe), decode
//! failures never reach the engine, and handler errors are logged but not
//! retried.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod queue;

use async_trait::async_trait;
use doorman_core::UpdateHandler;

pub use config::HttpSubscriberConfig;
pub use discovery::{DiscoverySubscriber, ServerSpec};
pub use error::{Result, SubscriberError};
pub use http::HttpSubscriber;
pub use queue::QueueSubscriber;

/// A medium that delivers distribution updates to a doorman.
///
/// `subscribe` is called once at setup; the implementation is responsible for
/// an independent background delivery loop thereafter.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Starts delivering updates for `doorman_id` to `update`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be set up. Errors occurring
    /// later, inside the delivery loop, are logged instead.
    async fn subscribe(&self, doorman_id: &str, update: UpdateHandler) -> Result<()>;
}
