//! Queue consumer transport.
//!
//! Broker clients (NSQ, NATS, an in-process pub/sub socket, anything with
//! at-least-once delivery) differ only in how bytes arrive; the decode and
//! hand-off logic is identical. This adapter takes the raw payload frames
//! over a channel so the broker-specific client stays outside this crate.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use doorman_core::{DistributionUpdate, UpdateHandler};

use crate::error::{Result, SubscriberError};
use crate::Subscriber;

/// Consumes raw update frames from a channel and forwards each decoded
/// message to the engine.
///
/// Frames that fail to decode are logged and dropped; they never reach the
/// engine. The background loop stops when every frame sender is dropped.
pub struct QueueSubscriber {
    frames: Mutex<Option<mpsc::Receiver<Bytes>>>,
}

impl QueueSubscriber {
    /// Creates a subscriber draining the given frame channel.
    #[must_use]
    pub fn new(frames: mpsc::Receiver<Bytes>) -> Self {
        Self { frames: Mutex::new(Some(frames)) }
    }

    /// Creates a subscriber together with the sender half its broker client
    /// should feed.
    #[must_use]
    pub fn channel(buffer: usize) -> (mpsc::Sender<Bytes>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl Subscriber for QueueSubscriber {
    async fn subscribe(&self, doorman_id: &str, update: UpdateHandler) -> Result<()> {
        let mut frames = self
            .frames
            .lock()
            .take()
            .ok_or(SubscriberError::AlreadySubscribed)?;
        let id = doorman_id.to_string();
        tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                match serde_json::from_slice::<DistributionUpdate>(&frame) {
                    Ok(message) => {
                        if let Err(err) = update(&message) {
                            warn!(id = %id, error = %err, "doorman rejected queued update");
                        }
                    }
                    Err(err) => {
                        warn!(id = %id, error = %err, "dropping undecodable update frame");
                    }
                }
            }
            debug!(id = %id, "frame channel closed, stopping queue subscriber");
        });
        Ok(())
    }
}
