//! Registry of live connections and their outbound queues
//!
//! Every connection owns a bounded queue drained by its own writer task. The
//! registry only ever `try_send`s into those queues, so one slow or dead
//! socket cannot hold up delivery to anybody else.

mod handle;

pub use handle::{DeliveryHandle, DEFAULT_SEND_QUEUE};

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::DeliveryError;
use crate::types::{ConnectionId, ServerFrame};

/// Concurrent map of connected identities to delivery handles
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, DeliveryHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`, replacing the handle if it is already registered
    pub fn register(&self, id: ConnectionId, handle: DeliveryHandle) {
        if self.connections.insert(id.clone(), handle).is_some() {
            tracing::debug!(connection_id = %id, "Re-registered connection, handle replaced");
        }
    }

    /// Remove `id`. Returns false if it was not registered.
    pub fn unregister(&self, id: &ConnectionId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Deliver `frame` to every registered connection.
    ///
    /// Best effort: per-recipient failures are logged and skipped. Returns the
    /// number of queues the frame was placed on.
    pub fn broadcast(&self, frame: ServerFrame) -> usize {
        let frame = Arc::new(frame);

        // Clone handles out first so no shard lock is held while sending
        let targets: Vec<(ConnectionId, DeliveryHandle)> = self
            .connections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, handle) in targets {
            match handle.send(Arc::clone(&frame)) {
                Ok(()) => delivered += 1,
                Err(e) => log_delivery_failure(&id, frame.name(), e),
            }
        }
        delivered
    }

    /// Deliver `frame` to a single connection
    pub fn send_to(&self, id: &ConnectionId, frame: ServerFrame) -> Result<(), DeliveryError> {
        let handle = self
            .connections
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(DeliveryError::Closed)?;

        let name = frame.name();
        handle.send(Arc::new(frame)).inspect_err(|&e| log_delivery_failure(id, name, e))
    }
}

fn log_delivery_failure(id: &ConnectionId, frame: &str, err: DeliveryError) {
    match err {
        DeliveryError::QueueFull => {
            tracing::warn!(connection_id = %id, frame, "Send queue full, dropping frame")
        }
        // The connection is on its way out; its disconnect will clean up
        DeliveryError::Closed => {
            tracing::debug!(connection_id = %id, frame, "Recipient closed, dropping frame")
        }
    }
}
