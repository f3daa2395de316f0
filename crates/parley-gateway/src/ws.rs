// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for live chat rooms.
//!
//! Client -> Server (JSON):
//! ```json
//! {"content": "hi, how can I help?", "author": "operator"}
//! ```
//!
//! Server -> Client (JSON): the room's [`RoomEvent`]s as published, e.g.
//! ```json
//! {"chat_room_id": "...", "content": "...", "role": "user", "author": "bob@x.com"}
//! ```

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use parley_core::RealtimePublisher;
use parley_core::types::{ChatRole, RoomEvent};
use serde::Deserialize;

use crate::server::GatewayState;

/// WebSocket message from a connected party.
#[derive(Debug, Deserialize)]
struct WsIncoming {
    content: String,
    #[serde(default)]
    author: Option<String>,
}

/// WebSocket upgrade handler for one live room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(chat_room_id): Path<String>,
    State(state): State<GatewayState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, chat_room_id, state))
}

/// Handle an individual WebSocket connection.
///
/// Spawns a sender task that forwards the room's broadcast events to the
/// client, then reads incoming messages and publishes them to the room.
async fn handle_socket(socket: WebSocket, chat_room_id: String, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let mut events = state.hub.subscribe(&chat_room_id);

    let sender_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text_str: &str = &text;
                let incoming: WsIncoming = match serde_json::from_str(text_str) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!("invalid WebSocket message: {e}");
                        continue;
                    }
                };

                let author = incoming.author.unwrap_or_else(|| "visitor".to_string());
                let role = if author == "operator" {
                    ChatRole::Assistant
                } else {
                    ChatRole::User
                };

                if let Err(e) = state
                    .engine
                    .conversation()
                    .record(&chat_room_id, &incoming.content, role)
                    .await
                {
                    tracing::error!(chat_room_id, error = %e, "failed to persist ws message");
                    continue;
                }
                if let Err(e) = state
                    .hub
                    .publish(RoomEvent {
                        chat_room_id: chat_room_id.clone(),
                        content: incoming.content,
                        role,
                        author,
                    })
                    .await
                {
                    tracing::warn!(chat_room_id, error = %e, "failed to publish ws message");
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by tungstenite layer)
        }
    }

    // Cleanup.
    sender_task.abort();
    state.hub.prune(&chat_room_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_incoming_deserializes_minimal() {
        let json = r#"{"content": "hello"}"#;
        let msg: WsIncoming = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content, "hello");
        assert!(msg.author.is_none());
    }

    #[test]
    fn ws_incoming_deserializes_with_author() {
        let json = r#"{"content": "hello", "author": "operator"}"#;
        let msg: WsIncoming = serde_json::from_str(json).unwrap();
        assert_eq!(msg.author.as_deref(), Some("operator"));
    }
}
