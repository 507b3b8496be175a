//! WebSocket handler — per-connection event loop.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → generate a connection id, open the per-connection channel
//! 2. Client sends `join` → gateway registers, presence push goes out
//! 3. Client sends `message` → relay fans out to peers
//! 4. Close (or transport error) → implicit leave, registry cleanup
//!
//! DESIGN
//! ======
//! Inbound events are handled by `handle_inbound_text`, which returns the
//! events destined for the sender only; peer deliveries always travel
//! through the registry channels. This keeps transport concerns out of the
//! dispatch path so tests can drive it without a socket.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::{ClientEvent, ServerEvent};
use crate::services::gateway::{self, SessionError};
use crate::state::AppState;

/// Outbound channel capacity per connection. A client that stops reading
/// loses pushes once this fills; the next membership change resends fresh
/// state.
const OUTBOUND_CAPACITY: usize = 256;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(OUTBOUND_CAPACITY);

    info!(%connection_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = handle_inbound_text(&state, connection_id, &client_tx, &text).await;
                        for event in replies {
                            let _ = send_event(&mut socket, &event).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    // Transport close is an implicit leave; cleanup must always run.
    gateway::leave(&state, connection_id).await;
    info!(%connection_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse and process one inbound text frame. Returns events for the sender
/// only — rejected events come back as system notices so one connection's
/// mistake never reaches anyone else.
async fn handle_inbound_text(
    state: &AppState,
    connection_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    text: &str,
) -> Vec<ServerEvent> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%connection_id, error = %e, "ws: invalid inbound event");
            return vec![ServerEvent::system(format!("invalid event: {e}"))];
        }
    };

    match event {
        ClientEvent::Join { username } => {
            match gateway::join(state, connection_id, &username, client_tx.clone()).await {
                Ok(name) => {
                    info!(%connection_id, name = %name, "ws: join accepted");
                    vec![]
                }
                Err(e) => error_reply(connection_id, &e),
            }
        }
        ClientEvent::Message { text } => match gateway::send(state, connection_id, &text).await {
            Ok(()) => vec![],
            Err(e) => error_reply(connection_id, &e),
        },
    }
}

fn error_reply(connection_id: Uuid, err: &SessionError) -> Vec<ServerEvent> {
    warn!(%connection_id, code = err.code(), error = %err, "ws: rejected event");
    vec![ServerEvent::system(format!("{}: {err}", err.code()))]
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
