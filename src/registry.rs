//! Connection registry — the single shared mutable resource.
//!
//! DESIGN
//! ======
//! A connection appears here only after a successful join; before that the
//! WebSocket task holds it alone. Join order is preserved so presence
//! snapshots list users in the order they arrived. All reads hand out
//! copies — callers never hold references into the registry across an await.

use std::collections::HashMap;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::event::ServerEvent;

// =============================================================================
// TYPES
// =============================================================================

/// A connection that has completed the join handshake.
#[derive(Debug, Clone)]
struct JoinedConnection {
    name: String,
    tx: mpsc::Sender<ServerEvent>,
}

/// Defensive check only — the transport generates a fresh id per accept, so
/// a collision means a double join on one connection.
#[derive(Debug, thiserror::Error)]
#[error("connection already registered: {0}")]
pub struct DuplicateConnection(pub Uuid);

/// Joined connections keyed by connection id, with join order preserved.
///
/// Owned exclusively by `AppState`; mutations happen under its write lock,
/// snapshots under its read lock.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<Uuid, JoinedConnection>,
    /// Join order. Kept in sync with `connections`.
    order: Vec<Uuid>,
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a joined connection at the end of the presence order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateConnection` if the id is already registered.
    pub fn add(
        &mut self,
        id: Uuid,
        name: String,
        tx: mpsc::Sender<ServerEvent>,
    ) -> Result<(), DuplicateConnection> {
        if self.connections.contains_key(&id) {
            return Err(DuplicateConnection(id));
        }
        self.connections.insert(id, JoinedConnection { name, tx });
        self.order.push(id);
        Ok(())
    }

    /// Remove a connection. Idempotent; absent ids are a no-op.
    /// Returns the display name if the connection was present, so callers
    /// can tell whether membership actually changed.
    pub fn remove(&mut self, id: Uuid) -> Option<String> {
        let removed = self.connections.remove(&id)?;
        self.order.retain(|entry| *entry != id);
        Some(removed.name)
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

impl ConnectionRegistry {
    /// Join-ordered presence list. Copy-based, no side effects.
    #[must_use]
    pub fn snapshot_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|id| self.connections.get(id))
            .map(|conn| conn.name.clone())
            .collect()
    }

    /// Display name of a joined connection, if any.
    #[must_use]
    pub fn name_of(&self, id: Uuid) -> Option<&str> {
        self.connections.get(&id).map(|conn| conn.name.as_str())
    }

    /// Cloned senders for every joined connection.
    #[must_use]
    pub fn all(&self) -> Vec<mpsc::Sender<ServerEvent>> {
        self.connections.values().map(|conn| conn.tx.clone()).collect()
    }

    /// Cloned senders for fan-out, excluding one connection.
    #[must_use]
    pub fn all_except(&self, id: Uuid) -> Vec<mpsc::Sender<ServerEvent>> {
        self.connections
            .iter()
            .filter(|(conn_id, _)| **conn_id != id)
            .map(|(_, conn)| conn.tx.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
