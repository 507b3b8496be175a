//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the connection registry behind a single `RwLock`: write lock for
//! membership changes (single-writer discipline), read lock for snapshots.
//! The lock is never held across a delivery await.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::registry::ConnectionRegistry;

/// Shared application state. Clone is required by Axum — the registry is
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<ConnectionRegistry>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { registry: Arc::new(RwLock::new(ConnectionRegistry::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_state_has_empty_registry() {
        let state = AppState::new();
        assert!(state.registry.read().await.is_empty());
    }

    #[tokio::test]
    async fn seeded_connection_is_visible_in_snapshots() {
        let state = AppState::new();
        let (id, _rx) = test_helpers::join_connection(&state, "alice").await;

        let registry = state.registry.read().await;
        assert_eq!(registry.snapshot_names(), vec!["alice"]);
        assert_eq!(registry.name_of(id), Some("alice"));
    }
}
