//! WebSocket application state

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::relay::Dispatcher;
use crate::utils::MonotonicClock;

/// Shared application state for WebSocket connections
pub struct AppState {
    /// The relay pipeline every connection feeds into
    pub dispatcher: Arc<Dispatcher>,

    /// Settings the transport needs per connection (frame cap, queue depth)
    pub config: RelayConfig,

    /// Time source for rate limiting, started with the server
    pub clock: MonotonicClock,
}

impl AppState {
    /// Create state with a fresh dispatcher built from `config`
    pub fn new(config: RelayConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::from_config(&config));
        Self {
            dispatcher,
            config,
            clock: MonotonicClock::new(),
        }
    }

    /// Number of connected clients
    pub fn connection_count(&self) -> usize {
        self.dispatcher.registry().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DeliveryHandle;
    use crate::types::ConnectionId;

    #[test]
    fn test_connection_count_tracks_dispatcher() {
        let state = AppState::new(RelayConfig::default());
        assert_eq!(state.connection_count(), 0);

        let (handle, _rx) = DeliveryHandle::channel(4);
        let id = ConnectionId::new();
        state.dispatcher.on_connect(id.clone(), handle);
        assert_eq!(state.connection_count(), 1);

        state.dispatcher.on_disconnect(&id);
        assert_eq!(state.connection_count(), 0);
    }
}
