//! Sliding window of admission timestamps

use std::collections::VecDeque;

/// Ordered admission timestamps (ms) for one connection
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    stamps: VecDeque<u64>,
}

impl SlidingWindow {
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            stamps: VecDeque::with_capacity(max_events),
        }
    }

    /// Record `now` if fewer than `max_events` admissions remain in the window.
    ///
    /// Timestamps `t` with `now - t >= window_ms` have left the window. A
    /// `now` older than the newest stamp is clamped to it, which keeps the
    /// deque sorted so eviction only ever looks at the front.
    pub fn admit(&mut self, now: u64, window_ms: u64, max_events: usize) -> bool {
        let now = self.stamps.back().map_or(now, |&last| now.max(last));

        while let Some(&oldest) = self.stamps.front() {
            if now - oldest >= window_ms {
                self.stamps.pop_front();
            } else {
                break;
            }
        }

        if self.stamps.len() >= max_events {
            return false;
        }
        self.stamps.push_back(now);
        true
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_max() {
        let mut w = SlidingWindow::with_capacity(3);
        assert!(w.admit(0, 1000, 3));
        assert!(w.admit(1, 1000, 3));
        assert!(w.admit(2, 1000, 3));
        assert!(!w.admit(3, 1000, 3));
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_rejection_is_not_recorded() {
        let mut w = SlidingWindow::with_capacity(1);
        assert!(w.admit(0, 1000, 1));
        for t in 1..100 {
            assert!(!w.admit(t, 1000, 1));
        }
        assert_eq!(w.len(), 1);
        // Only the admitted stamp at 0 counts, so 1000 is free again
        assert!(w.admit(1000, 1000, 1));
    }

    #[test]
    fn test_expiry_is_exact_at_window_edge() {
        let mut w = SlidingWindow::with_capacity(2);
        assert!(w.admit(100, 1000, 2));
        assert!(w.admit(600, 1000, 2));
        assert!(!w.admit(1099, 1000, 2));
        assert!(w.admit(1100, 1000, 2));
        assert!(!w.admit(1599, 1000, 2));
        assert!(w.admit(1600, 1000, 2));
    }

    #[test]
    fn test_backwards_clock_is_clamped() {
        let mut w = SlidingWindow::with_capacity(3);
        assert!(w.admit(5000, 1000, 3));
        assert!(w.admit(10, 1000, 3));
        assert_eq!(w.len(), 2);
        // Both stamps are at 5000 now, so they expire together
        assert!(w.admit(6000, 1000, 3));
        assert_eq!(w.len(), 1);
    }
}
