//! Time and timestamp utilities

use tokio::time::Instant;

/// Millisecond clock that only moves forward.
///
/// Readings count from the clock's creation, so stepping the system clock
/// cannot push rate-limit windows into the future or the past.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_clock_counts_from_creation() {
        let clock = MonotonicClock::new();
        assert_eq!(clock.now_ms(), 0);

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(clock.now_ms(), 1500);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(clock.now_ms(), 61_500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_copies_share_origin() {
        let clock = MonotonicClock::new();
        tokio::time::advance(Duration::from_millis(250)).await;

        let copy = clock;
        assert_eq!(copy.now_ms(), clock.now_ms());
        assert_eq!(copy.now_ms(), 250);
    }
}
