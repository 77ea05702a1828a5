//! Rate limiter keyed by connection

use dashmap::DashMap;
use parking_lot::Mutex;

use super::SlidingWindow;
use crate::types::ConnectionId;

pub const DEFAULT_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_MAX_EVENTS: usize = 60;

/// Sliding-window rate limiter with one lock per connection.
///
/// The map is sharded, and each window has its own mutex, so checks for
/// different connections never wait on each other beyond a shard lookup.
pub struct RateLimiter {
    windows: DashMap<ConnectionId, Mutex<SlidingWindow>>,
    window_ms: u64,
    max_events: usize,
}

impl RateLimiter {
    pub fn new(window_ms: u64, max_events: usize) -> Self {
        Self {
            windows: DashMap::new(),
            window_ms,
            max_events,
        }
    }

    /// Decide whether `id` may send an event at `now` (ms).
    ///
    /// Creates the window on first use.
    pub fn admit(&self, id: &ConnectionId, now: u64) -> bool {
        if let Some(window) = self.windows.get(id) {
            return window.lock().admit(now, self.window_ms, self.max_events);
        }

        let window = self
            .windows
            .entry(id.clone())
            .or_insert_with(|| Mutex::new(SlidingWindow::with_capacity(self.max_events)));
        let admitted = window.lock().admit(now, self.window_ms, self.max_events);
        admitted
    }

    /// Drop all state for `id`. No-op if none exists.
    pub fn forget(&self, id: &ConnectionId) {
        self.windows.remove(id);
    }

    /// Number of admissions currently recorded for `id`
    pub fn recorded(&self, id: &ConnectionId) -> Option<usize> {
        self.windows.get(id).map(|w| w.lock().len())
    }

    /// Number of connections with live rate state
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS, DEFAULT_MAX_EVENTS)
    }
}
