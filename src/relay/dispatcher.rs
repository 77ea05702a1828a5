//! Per-event pipeline: size check, validate, rate-check, stamp, broadcast

use std::sync::Arc;

use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::Rejection;
use crate::rate_limit::RateLimiter;
use crate::registry::{ConnectionRegistry, DeliveryHandle};
use crate::types::{ConnectionId, OutboundEvent, ServerFrame};
use crate::validation::EventValidator;

/// What happened to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Relayed; `recipients` queues accepted the frame
    Broadcast { recipients: usize },

    /// Refused; a notice was sent back to the sender only
    Rejected(Rejection),

    /// The sender is not registered (already disconnected or never connected)
    UnknownConnection,
}

/// Orchestrates connection lifecycle and the per-event pipeline.
///
/// Holds no state of its own; the registry and limiter are shared services.
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
    limiter: Arc<RateLimiter>,
    validator: EventValidator,
    max_event_bytes: usize,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        limiter: Arc<RateLimiter>,
        validator: EventValidator,
        max_event_bytes: usize,
    ) -> Self {
        Self {
            registry,
            limiter,
            validator,
            max_event_bytes,
        }
    }

    /// Build a dispatcher with fresh collaborators sized from `config`
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::new(RateLimiter::new(config.rate_window_ms, config.rate_max_events)),
            EventValidator::new(config.max_field_bytes),
            config.max_event_bytes,
        )
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn on_connect(&self, id: ConnectionId, handle: DeliveryHandle) {
        tracing::info!(connection_id = %id, "User connected");
        self.registry.register(id, handle);
    }

    /// Run one raw inbound event through the pipeline.
    ///
    /// `now` is milliseconds on a monotonic clock, used only for rate limiting.
    pub fn on_message(&self, id: &ConnectionId, raw: &[u8], now: u64) -> DispatchOutcome {
        if !self.registry.contains(id) {
            tracing::warn!(connection_id = %id, "Event from unregistered connection ignored");
            return DispatchOutcome::UnknownConnection;
        }

        let event = match self.admit(id, raw, now) {
            Ok(event) => event,
            Err(rejection) => {
                tracing::debug!(connection_id = %id, reason = %rejection, "Event rejected");
                // Delivery failures are already logged by the registry
                let _ = self
                    .registry
                    .send_to(id, ServerFrame::Error(rejection.notice()));
                return DispatchOutcome::Rejected(rejection);
            }
        };

        // A disconnect may have landed while the event was being parsed. It
        // unregisters before it forgets, so if the id is gone now the window
        // `admit` just created would otherwise outlive the connection.
        if !self.registry.contains(id) {
            self.limiter.forget(id);
            tracing::debug!(connection_id = %id, "Sender disconnected mid-dispatch, event dropped");
            return DispatchOutcome::UnknownConnection;
        }

        let kind = event.event.kind.as_str();
        let recipients = self.registry.broadcast(ServerFrame::ChatMessage(event));
        tracing::debug!(connection_id = %id, kind, recipients, "Event relayed");

        DispatchOutcome::Broadcast { recipients }
    }

    /// Safe to call repeatedly or for connections that never registered
    pub fn on_disconnect(&self, id: &ConnectionId) {
        let was_registered = self.registry.unregister(id);
        self.limiter.forget(id);
        if was_registered {
            tracing::info!(connection_id = %id, "User disconnected");
        }
    }

    fn admit(&self, id: &ConnectionId, raw: &[u8], now: u64) -> Result<OutboundEvent, Rejection> {
        if raw.len() > self.max_event_bytes {
            return Err(Rejection::TooLarge {
                size: raw.len(),
                limit: self.max_event_bytes,
            });
        }

        let value: Value = serde_json::from_slice(raw).map_err(|_| Rejection::Malformed)?;
        let event = self.validator.validate(&value)?;

        if !self.limiter.admit(id, now) {
            return Err(Rejection::RateExceeded);
        }

        Ok(OutboundEvent::stamp(event, id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventKind, RejectionNotice};
    use tokio::sync::mpsc::Receiver;

    fn dispatcher(window_ms: u64, max_events: usize) -> Dispatcher {
        let config = RelayConfig {
            rate_window_ms: window_ms,
            rate_max_events: max_events,
            ..RelayConfig::default()
        };
        Dispatcher::from_config(&config)
    }

    fn connect(d: &Dispatcher, name: &str) -> (ConnectionId, Receiver<Arc<ServerFrame>>) {
        let id = ConnectionId::from(name);
        let (handle, rx) = DeliveryHandle::channel(128);
        d.on_connect(id.clone(), handle);
        (id, rx)
    }

    #[test]
    fn test_valid_event_is_stamped_and_echoed() {
        let d = dispatcher(60_000, 60);
        let (a, mut rx) = connect(&d, "a");

        let outcome = d.on_message(&a, br#"{"type":"text","content":"hi","nickname":"al"}"#, 0);
        assert_eq!(outcome, DispatchOutcome::Broadcast { recipients: 1 });

        match &*rx.try_recv().unwrap() {
            ServerFrame::ChatMessage(out) => {
                assert_eq!(out.user_id, a);
                assert_eq!(out.event.kind, EventKind::Text);
                assert_eq!(out.event.content, "hi");
                assert_eq!(out.event.nickname.as_deref(), Some("al"));
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_json_is_malformed() {
        let d = dispatcher(60_000, 60);
        let (a, mut rx) = connect(&d, "a");

        let outcome = d.on_message(&a, b"not json", 0);
        assert_eq!(outcome, DispatchOutcome::Rejected(Rejection::Malformed));
        assert_eq!(
            *rx.try_recv().unwrap(),
            ServerFrame::Error(RejectionNotice::new("invalid message format"))
        );
    }

    #[test]
    fn test_oversized_event_is_rejected_before_parsing() {
        let config = RelayConfig {
            max_event_bytes: 16,
            ..RelayConfig::default()
        };
        let d = Dispatcher::from_config(&config);
        let (a, mut rx) = connect(&d, "a");

        let raw = br#"{"type":"text","content":"0123456789"}"#;
        let outcome = d.on_message(&a, raw, 0);
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected(Rejection::TooLarge {
                size: raw.len(),
                limit: 16
            })
        );
        assert!(matches!(&*rx.try_recv().unwrap(), ServerFrame::Error(_)));
        assert_eq!(d.limiter().tracked(), 0);
    }

    #[test]
    fn test_invalid_events_do_not_consume_quota() {
        let d = dispatcher(60_000, 1);
        let (a, _rx) = connect(&d, "a");

        for _ in 0..5 {
            d.on_message(&a, br#"{"type":"bogus","content":"x"}"#, 0);
        }
        assert_eq!(
            d.on_message(&a, br#"{"type":"text","content":"x"}"#, 0),
            DispatchOutcome::Broadcast { recipients: 1 }
        );
    }

    #[test]
    fn test_unknown_connection_creates_no_state() {
        let d = dispatcher(60_000, 60);
        let ghost = ConnectionId::from("ghost");

        let outcome = d.on_message(&ghost, br#"{"type":"text","content":"x"}"#, 0);
        assert_eq!(outcome, DispatchOutcome::UnknownConnection);
        assert_eq!(d.limiter().tracked(), 0);
    }

    #[test]
    fn test_disconnect_without_connect_is_harmless() {
        let d = dispatcher(60_000, 60);
        d.on_disconnect(&ConnectionId::from("never"));
        assert!(d.registry().is_empty());
    }
}
