//! Chat Relay Server
//!
//! A real-time relay for end-to-end encrypted chat. Clients connect over
//! WebSocket and submit text or image events whose payloads are already
//! encrypted; the relay validates their shape, rate-limits each connection and
//! rebroadcasts every accepted event to all connected clients, stamped with
//! the sender's connection id. Payloads are never decrypted or stored.
//!
//! # Modules
//!
//! - `types`: Connection ids, chat events and wire frames
//! - `validation`: Structural checks for inbound events
//! - `rate_limit`: Per-connection sliding-window limiter
//! - `registry`: Live connections and their outbound queues
//! - `relay`: The dispatcher tying the above together
//! - `api`: WebSocket transport and HTTP routes
//! - `server`: Listener and shutdown handling
//! - `config`: Environment-driven settings
//!
//! # Example
//!
//! ```no_run
//! use chat_relay::{config::RelayConfig, server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RelayConfig::from_env().unwrap();
//!     server::run(config).await.unwrap();
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod registry;
pub mod relay;
pub mod server;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use config::RelayConfig;
pub use error::{DeliveryError, Rejection};
pub use rate_limit::RateLimiter;
pub use registry::{ConnectionRegistry, DeliveryHandle};
pub use relay::{DispatchOutcome, Dispatcher};
pub use types::{
    ChatEvent, ConnectionId, EventKind, OutboundEvent, RejectionNotice, RelayResult, ServerFrame,
};
pub use validation::EventValidator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
