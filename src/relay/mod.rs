//! Relay dispatcher
//!
//! Composes the registry, rate limiter and validator behind the three
//! callbacks the transport drives: connect, message, disconnect.

mod dispatcher;

pub use dispatcher::{DispatchOutcome, Dispatcher};
