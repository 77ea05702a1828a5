//! Data types for the chat relay
//!
//! This module contains the identities, chat events and wire frames shared by
//! every other part of the relay.

mod event;
mod frame;
mod identity;

pub use event::{ChatEvent, EventKind, OutboundEvent};
pub use frame::{RejectionNotice, ServerFrame};
pub use identity::ConnectionId;

/// Result type for fallible relay setup and I/O
pub type RelayResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
