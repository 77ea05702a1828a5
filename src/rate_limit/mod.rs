//! Per-connection admission control
//!
//! Exact sliding-window counter: a connection may have at most `max_events`
//! admissions in any trailing window of `window_ms` milliseconds.
//! Expiry is lazy, computed at each `admit`.

mod limiter;
mod window;

pub use limiter::{RateLimiter, DEFAULT_MAX_EVENTS, DEFAULT_WINDOW_MS};
pub use window::SlidingWindow;
