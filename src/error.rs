//! Error types for admission and delivery
//!
//! None of these are fatal: a `Rejection` is reported back to the offending
//! connection and a `DeliveryError` is logged and dropped.

use crate::types::RejectionNotice;

/// Why an inbound event was not relayed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("invalid message format")]
    Malformed,

    #[error("message too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("too many messages, try again later")]
    RateExceeded,
}

impl Rejection {
    /// Notice delivered to the sender
    pub fn notice(&self) -> RejectionNotice {
        RejectionNotice::new(self.to_string())
    }
}

/// Failure to hand a frame to one recipient's outbound queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("send queue full")]
    QueueFull,

    #[error("connection closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::Malformed.notice().message, "invalid message format");
        assert_eq!(
            Rejection::RateExceeded.notice().message,
            "too many messages, try again later"
        );
        assert!(Rejection::TooLarge { size: 10, limit: 5 }
            .to_string()
            .contains("too large"));
    }
}
