//! Wire events — the JSON protocol spoken over the WebSocket.
//!
//! DESIGN
//! ======
//! Two inbound event kinds and two outbound event kinds, externally tagged
//! on `event`. Clients send `join` and `message`; the server pushes
//! `message` (system notices and relayed chat lines) and `userList`
//! (presence snapshots). Timestamps are always server-assigned — a client
//! supplied timestamp is never trusted or echoed.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// =============================================================================
// TIME
// =============================================================================

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// TYPES
// =============================================================================

/// How the receiving client should render a pushed `message` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Server-generated notice (joins, leaves, rejected events).
    System,
    /// A chat line relayed from another connection.
    Other,
}

/// One relayed chat line. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    /// Milliseconds since Unix epoch, assigned at construction.
    pub sent_at: i64,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: sender.into(), text: text.into(), sent_at: now_ms() }
    }
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// Events a client may send. Anything else is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Bind a display name to this connection. Valid once, before anything else.
    Join { username: String },
    /// A chat line to fan out to every other joined connection.
    Message { text: String },
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Events the server pushes to connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    Message {
        #[serde(rename = "type")]
        kind: MessageKind,
        text: String,
        /// Present only on relayed chat lines, never on system notices.
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        ts: i64,
    },
    UserList { users: Vec<String> },
}

impl ServerEvent {
    /// A system notice, timestamped now.
    pub fn system(text: impl Into<String>) -> Self {
        Self::Message { kind: MessageKind::System, text: text.into(), sender: None, ts: now_ms() }
    }

    /// A presence snapshot push.
    #[must_use]
    pub fn user_list(users: Vec<String>) -> Self {
        Self::UserList { users }
    }
}

impl From<ChatMessage> for ServerEvent {
    fn from(msg: ChatMessage) -> Self {
        Self::Message { kind: MessageKind::Other, text: msg.text, sender: Some(msg.sender), ts: msg.sent_at }
    }
}

// =============================================================================
// TESTS
// =============================================================================
