//! WebSocket connection handlers.
//!
//! One task reads inbound frames (heartbeats and donation alerts), another
//! drains the connection's outbound queue. When either ends, the other is
//! aborted and the connection is unregistered.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{AppendOutcome, ConnectionId, InboundMessage, classify},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued messages to the WebSocket sender.
///
/// The loop ends when the queue is closed (connection unregistered) or the
/// socket refuses a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(msg.into())).await {
                tracing::warn!("Failed to send to connection '{}': {}", connection_id, e);
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' established", connection_id);

    let (sender, mut receiver) = socket.split();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol; binary frames are not part of it
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender, connection_id);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let closed_channel = state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
    let remaining = state
        .disconnect_client_usecase
        .count_remaining_connections()
        .await;
    match closed_channel {
        Some(channel) => tracing::info!(
            "Connection '{}' closed, channel '{}' is now disconnected ({} remaining)",
            connection_id,
            channel,
            remaining
        ),
        None => tracing::info!(
            "Connection '{}' closed ({} remaining)",
            connection_id,
            remaining
        ),
    }
}

async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    match classify(text) {
        InboundMessage::Heartbeat(channel) => {
            tracing::trace!("Heartbeat from '{}' for '{}'", connection_id, channel);
            state
                .record_heartbeat_usecase
                .execute(connection_id, channel)
                .await;
        }
        InboundMessage::Donation(text) => {
            tracing::info!("New donation message: {}", text);
            match state.receive_donation_usecase.execute(text).await {
                Ok(AppendOutcome::Appended) => {}
                Ok(AppendOutcome::Duplicate) => {
                    tracing::debug!("Donation message was a duplicate, skipped");
                }
                Err(e) => {
                    tracing::warn!("Failed to parse donation '{}': {}", text, e);
                }
            }
        }
        InboundMessage::Ignored => {
            tracing::debug!("Ignored malformed heartbeat from '{}': {}", connection_id, text);
        }
    }
}
