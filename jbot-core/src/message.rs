//! Incoming message type and the transport message kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport message kind. Only [`Chat`](MessageKind::Chat) messages are dispatched;
/// the rest are ignored by the intake loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Chat,
    GroupChat,
    Headline,
    Normal,
    Error,
}

/// A single incoming message: sender identity (possibly with a `/resource` suffix),
/// kind, body text, and when the transport received it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub kind: MessageKind,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl Message {
    pub fn new(from: impl Into<String>, kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            kind,
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// A chat-kind message, the only kind the engine processes.
    pub fn chat(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(from, MessageKind::Chat, body)
    }
}
