//! Frames written to a client's socket

use serde::{Deserialize, Serialize};

use super::{ConnectionId, OutboundEvent};

/// Human-readable rejection sent only to the connection that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionNotice {
    pub message: String,
}

impl RejectionNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Server-to-client frame, serialized as `{"event": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerFrame {
    /// Sent once on connect so the client learns its own identity
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "userId")]
        user_id: ConnectionId,
    },

    /// A relayed chat event
    #[serde(rename = "chat message")]
    ChatMessage(OutboundEvent),

    /// A rejection notice
    #[serde(rename = "error")]
    Error(RejectionNotice),
}

impl ServerFrame {
    /// Name of the frame on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::ChatMessage(_) => "chat message",
            Self::Error(_) => "error",
        }
    }
}
