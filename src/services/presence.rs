//! Presence broadcast — pushes the online-user list on membership changes.
//!
//! DESIGN
//! ======
//! Best-effort, at-most-once per change event. The snapshot is taken after
//! the membership mutation, so rapid changes may collapse: a connection that
//! misses an intermediate list still converges on the latest one.

use tracing::debug;

use crate::event::ServerEvent;
use crate::state::AppState;

/// Push a fresh join-ordered user list to every joined connection.
/// Called by the gateway after any add or remove.
pub async fn membership_changed(state: &AppState) {
    let (users, targets) = {
        let registry = state.registry.read().await;
        (registry.snapshot_names(), registry.all())
    };
    debug!(online = users.len(), "presence: broadcasting user list");

    let event = ServerEvent::user_list(users);
    for tx in targets {
        // Full or closed channels are skipped; the next membership change
        // delivers a fresh list anyway.
        let _ = tx.try_send(event.clone());
    }
}

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;
