//! WebSocket connection handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, Identity};
use crate::infrastructure::dto::websocket::InboundFrame;
use crate::ui::state::AppState;

use super::credentials::resolve_identity;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Identity is derived once, before the upgrade completes, and never
    // re-derived for the lifetime of the connection.
    let identity = resolve_identity(state.resolver.as_ref(), &headers, &params).await;
    tracing::info!(
        "websocket handshake accepted (user='{}', authenticated={})",
        identity.display_name,
        identity.authenticated
    );

    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Spawns a task that receives frames from the rx channel and pushes
/// them to the WebSocket sender.
///
/// This is the outbound half of a session: everything the broadcast
/// engine hands to this connection's channel ends up on the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Identity) {
    let connection_id = ConnectionId::new();
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Active: register and announce the join to everyone already present.
    state
        .connect_session
        .execute(connection_id.clone(), identity.clone(), tx)
        .await;

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_identity = identity.clone();
    let recv_connection = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("websocket read failed: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // A malformed frame ends the session like any other
                    // read failure.
                    let frame = match serde_json::from_str::<InboundFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(
                                "malformed frame from '{}': {}",
                                recv_identity.display_name,
                                e
                            );
                            break;
                        }
                    };

                    let outcome = recv_state
                        .send_message
                        .execute(&recv_connection, &recv_identity, frame)
                        .await;
                    tracing::debug!(
                        "message from '{}' delivered to {} connection(s)",
                        recv_identity.display_name,
                        outcome.delivered
                    );
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", recv_identity.display_name);
                    break;
                }
                Message::Binary(_) => {
                    tracing::warn!(
                        "unexpected binary frame from '{}', closing",
                        recv_identity.display_name
                    );
                    break;
                }
                // Ping/pong is handled by the protocol layer.
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Closed: unregister and announce the departure to the remaining
    // connections.
    let left = state.disconnect_session.execute(&connection_id).await;
    tracing::info!("websocket closed (user='{}')", left.display_name);
}
