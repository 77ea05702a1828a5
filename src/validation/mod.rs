//! Structural validation of inbound chat events
//!
//! The relay only checks shape. Payload bytes are opaque and decoration fields
//! are display hints, so neither is inspected beyond its JSON type.

mod event;

pub use event::{EventValidator, DEFAULT_MAX_FIELD_BYTES};
