//! Session gateway — join/leave/send orchestration.
//!
//! DESIGN
//! ======
//! Each connection walks `Connected(unjoined) -> Joined -> Disconnected`.
//! The WebSocket task owns the unjoined phase; the registry owns the joined
//! phase; `leave` is the single teardown path for both explicit leaves and
//! transport closes. Errors here are per-connection: they are reported back
//! to the offending client and never affect anyone else.

use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::event::ServerEvent;
use crate::registry::DuplicateConnection;
use crate::services::{presence, relay};
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("display name must not be empty")]
    InvalidName,
    #[error("join with a display name before sending messages")]
    NotJoined,
    #[error(transparent)]
    DuplicateConnection(#[from] DuplicateConnection),
}

impl SessionError {
    /// Grepable code, included in the notice sent back to the client.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "E_INVALID_NAME",
            Self::NotJoined => "E_NOT_JOINED",
            Self::DuplicateConnection(_) => "E_DUPLICATE_CONNECTION",
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Bind a display name to a connection: validate, register, then push the
/// updated user list and a join notice to everyone (the joiner included).
/// Returns the trimmed name actually registered.
///
/// # Errors
///
/// Returns `InvalidName` for an empty or whitespace-only name, or
/// `DuplicateConnection` if this connection already joined. Neither alters
/// the presence list.
pub async fn join(
    state: &AppState,
    connection_id: Uuid,
    raw_name: &str,
    tx: mpsc::Sender<ServerEvent>,
) -> Result<String, SessionError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(SessionError::InvalidName);
    }
    let name = name.to_string();

    state.registry.write().await.add(connection_id, name.clone(), tx)?;
    info!(%connection_id, name = %name, "session: joined");

    presence::membership_changed(state).await;
    broadcast_system(state, format!("{name} joined the chat")).await;
    Ok(name)
}

/// Tear down a connection. Idempotent — safe for explicit leaves, transport
/// closes, and connections that never joined. Announces the departure only
/// if the connection had joined.
pub async fn leave(state: &AppState, connection_id: Uuid) {
    let removed = state.registry.write().await.remove(connection_id);
    let Some(name) = removed else {
        return;
    };
    info!(%connection_id, name = %name, "session: left");

    presence::membership_changed(state).await;
    broadcast_system(state, format!("{name} left the chat")).await;
}

/// Relay a chat line to every other joined connection.
///
/// # Errors
///
/// Returns `NotJoined` if this connection has no display name yet; nothing
/// is delivered in that case.
pub async fn send(state: &AppState, connection_id: Uuid, text: &str) -> Result<(), SessionError> {
    relay::relay(state, connection_id, text).await
}

// =============================================================================
// HELPERS
// =============================================================================

/// Push a system notice to every joined connection. Best-effort: a full or
/// closed channel is skipped.
async fn broadcast_system(state: &AppState, text: String) {
    let targets = state.registry.read().await.all();
    let event = ServerEvent::system(text);
    for tx in targets {
        let _ = tx.try_send(event.clone());
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
