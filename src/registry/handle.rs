//! Delivery handle for one connection's outbound queue

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::DeliveryError;
use crate::types::ServerFrame;

/// Default outbound queue depth per connection
pub const DEFAULT_SEND_QUEUE: usize = 256;

/// Non-blocking sender into a connection's outbound queue.
///
/// Frames are shared behind `Arc` so a broadcast does not copy the payload
/// once per recipient.
#[derive(Debug, Clone)]
pub struct DeliveryHandle {
    tx: mpsc::Sender<Arc<ServerFrame>>,
}

impl DeliveryHandle {
    /// Create a handle and the receiver its writer task drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Arc<ServerFrame>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue `frame` without waiting
    pub fn send(&self, frame: Arc<ServerFrame>) -> Result<(), DeliveryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
