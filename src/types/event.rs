//! Chat event types

use serde::{Deserialize, Serialize};

use super::ConnectionId;

/// Kind of chat payload. The relay never looks inside the payload itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Text,
    Image,
}

impl EventKind {
    /// Parse the wire literal (`"text"` / `"image"`)
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// A validated inbound chat event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Sender-encrypted payload, relayed byte-for-byte
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChatEvent {
    pub fn new(kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            nickname: None,
            color: None,
        }
    }
}

/// A chat event stamped with the identity of the connection that sent it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEvent {
    #[serde(flatten)]
    pub event: ChatEvent,

    #[serde(rename = "userId")]
    pub user_id: ConnectionId,
}

impl OutboundEvent {
    pub fn stamp(event: ChatEvent, sender: ConnectionId) -> Self {
        Self {
            event,
            user_id: sender,
        }
    }
}
