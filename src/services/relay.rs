//! Message relay — fan-out of chat lines to all connections but the sender.
//!
//! DESIGN
//! ======
//! The relay never echoes to the sender: the originating client renders its
//! own message locally on send. Recipients are independent — delivery
//! failure to one (already disconnected, channel full) is swallowed and
//! never fails the relay as a whole.

use tracing::info;
use uuid::Uuid;

use crate::event::{ChatMessage, ServerEvent};
use crate::services::gateway::SessionError;
use crate::state::AppState;

/// Relay `text` from `sender_id` to every other joined connection, stamped
/// with the sender's display name and a server-assigned timestamp.
///
/// # Errors
///
/// Returns `NotJoined` if the sender has no registry entry; no delivery
/// happens in that case.
pub async fn relay(state: &AppState, sender_id: Uuid, text: &str) -> Result<(), SessionError> {
    let (sender_name, targets) = {
        let registry = state.registry.read().await;
        let Some(name) = registry.name_of(sender_id) else {
            return Err(SessionError::NotJoined);
        };
        (name.to_string(), registry.all_except(sender_id))
    };

    let message = ChatMessage::new(sender_name, text);
    info!(%sender_id, recipients = targets.len(), "relay: chat message");

    let event = ServerEvent::from(message);
    for tx in targets {
        let _ = tx.try_send(event.clone());
    }
    Ok(())
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
