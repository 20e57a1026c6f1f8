//! Chat WebSocket handler.
//!
//! This module provides the WebSocket session loop for chat clients.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{Sink, SinkExt, Stream, StreamExt};

use crate::chat::{ChatHub, InboundMessage, MessagePipeline, Outbound, ServerEvent};

use super::messages::{event_frame, ClientMessage};

/// Query parameters for WebSocket connection.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WsQuery {
    /// Username to chat as.
    pub username: String,
    /// Room to join.
    pub room: String,
}

/// State for WebSocket chat handler.
#[derive(Clone)]
pub struct ChatWsState {
    /// Message pipeline for inbound messages.
    pub pipeline: Arc<MessagePipeline>,
    /// Connection hub.
    pub hub: Arc<ChatHub>,
}

impl ChatWsState {
    /// Create a new chat WebSocket state.
    pub fn new(pipeline: Arc<MessagePipeline>, hub: Arc<ChatHub>) -> Self {
        Self { pipeline, hub }
    }
}

/// WebSocket chat handler.
///
/// GET /ws?username={name}&room={room}
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ChatWsState>>,
    Query(query): Query<WsQuery>,
) -> Response {
    if query.username.trim().is_empty() || query.room.trim().is_empty() {
        tracing::debug!("WebSocket connection rejected: empty username or room");
        return (StatusCode::BAD_REQUEST, "username and room are required").into_response();
    }

    tracing::info!(
        user = %query.username,
        room = %query.room,
        "WebSocket connection accepted"
    );

    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<ChatWsState>, query: WsQuery) {
    let (ws_sender, ws_receiver) = socket.split();
    run_session(&state, &query, ws_sender, ws_receiver).await;
}

/// Run one chat session over a split socket.
///
/// The connection is registered with the hub for the lifetime of the
/// session. Inbound frames are handled one at a time, in arrival order.
pub async fn run_session<W, R>(
    state: &ChatWsState,
    query: &WsQuery,
    mut ws_sender: W,
    mut ws_receiver: R,
) where
    W: Sink<Message> + Unpin,
    W::Error: Display,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let (connection_id, mut outbound) = state.hub.register(&query.username, &query.room).await;
    tracing::debug!(connection = %connection_id, user = %query.username, "WebSocket session started");

    loop {
        tokio::select! {
            frame = ws_receiver.next() => {
                let Some(frame) = frame else {
                    break;
                };
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Message { message }) => {
                            let inbound = InboundMessage::new(
                                &query.room,
                                &query.username,
                                connection_id.clone(),
                                message,
                            );
                            state.pipeline.handle(&inbound).await;
                        }
                        Ok(ClientMessage::Ping) => {
                            if send_event(&mut ws_sender, &ServerEvent::Pong).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(connection = %connection_id, "Failed to parse client message: {}", e);
                        }
                    },
                    Ok(Message::Close(_)) => {
                        tracing::debug!(connection = %connection_id, "WebSocket closed by client");
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if ws_sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(connection = %connection_id, "WebSocket error: {}", e);
                        break;
                    }
                }
            }

            item = outbound.recv() => {
                match item {
                    Some(Outbound::Event(event)) => {
                        if send_event(&mut ws_sender, &event).await.is_err() {
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => {
                        let _ = ws_sender.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }
    }

    state.hub.unregister(&connection_id).await;
    tracing::debug!(connection = %connection_id, "WebSocket session ended");
}

/// Write one event as a text frame.
async fn send_event<W>(ws_sender: &mut W, event: &ServerEvent) -> Result<(), ()>
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let json = match event_frame(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(event = event.name(), "Failed to encode event: {}", e);
            return Ok(());
        }
    };
    ws_sender.send(Message::Text(json)).await.map_err(|e| {
        tracing::debug!("Failed to write frame: {}", e);
    })
}
