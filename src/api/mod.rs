//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the relay's WebSocket endpoint plus a small HTTP
//! surface (health check and optional static client files).

pub mod http;
pub mod websocket;
