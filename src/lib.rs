//! chatrelay — presence & broadcast session core for a real-time chat.
//!
//! ARCHITECTURE
//! ============
//! Clients connect over WebSocket, join with a display name, and exchange
//! chat lines. The server keeps one `ConnectionRegistry` of joined
//! connections; every membership change pushes a fresh online-user list,
//! and every chat line fans out to all connections except its sender.
//!
//! - `event` — the JSON wire protocol
//! - `registry` — joined connections, join-ordered
//! - `services` — gateway (join/leave/send), presence, relay
//! - `routes` — axum router + WebSocket handler

pub mod event;
pub mod registry;
pub mod routes;
pub mod services;
pub mod state;
