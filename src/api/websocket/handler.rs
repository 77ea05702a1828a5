//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::state::AppState;
use crate::registry::DeliveryHandle;
use crate::types::{ConnectionId, ServerFrame};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    // Frames over the cap are refused by the protocol layer before they are
    // buffered in full
    let limit = state.config.max_event_bytes;
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = ConnectionId::new();
    let (handle, rx) = DeliveryHandle::channel(state.config.send_queue_capacity);
    let (ws_tx, mut ws_rx) = socket.split();

    // Welcome goes in first so it precedes any broadcast on this stream
    if handle
        .send(Arc::new(ServerFrame::Connected {
            user_id: id.clone(),
        }))
        .is_err()
    {
        return;
    }

    let mut writer = tokio::spawn(write_frames(ws_tx, rx, id.clone()));
    state.dispatcher.on_connect(id.clone(), handle);

    let dispatcher = Arc::clone(&state.dispatcher);
    let clock = state.clock;
    let reader_id = id.clone();
    let reader = async move {
        while let Some(result) = ws_rx.next().await {
            let raw = match result {
                Ok(Message::Text(text)) => text.into_bytes(),
                Ok(Message::Binary(bytes)) => bytes,
                Ok(Message::Close(_)) => break,
                // axum answers pings itself
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    tracing::debug!(connection_id = %reader_id, error = %e, "Socket error");
                    break;
                }
            };
            dispatcher.on_message(&reader_id, &raw, clock.now_ms());
        }
    };

    tokio::select! {
        _ = &mut writer => {},
        _ = reader => {},
    }

    state.dispatcher.on_disconnect(&id);
    writer.abort();
}

/// Drain the connection's outbound queue into the socket
async fn write_frames<S>(mut ws_tx: S, mut rx: mpsc::Receiver<Arc<ServerFrame>>, id: ConnectionId)
where
    S: futures::Sink<Message> + Unpin,
{
    while let Some(frame) = rx.recv().await {
        let json = match serde_json::to_string(&*frame) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(connection_id = %id, error = %e, "Failed to serialize frame");
                continue;
            }
        };
        if ws_tx.send(Message::Text(json)).await.is_err() {
            break; // Client disconnected
        }
    }
    let _ = ws_tx.close().await;
}
