//! WebSocket transport for the relay
//!
//! Provides the `/ws` endpoint. Each socket gets a fresh `ConnectionId`, a
//! bounded outbound queue drained by a writer task, and a reader loop that
//! feeds inbound frames to the dispatcher in arrival order.

pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::AppState;
