//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatPayload, Connection, PlaybackCommand, RoomId},
    infrastructure::dto::websocket::{ClientEventDto, PlaybackPayloadDto},
    ui::state::AppState,
    usecase::{PlaybackOutcome, SendMessageError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Identity token; optional, and a bad one does not refuse the connection
    pub token: Option<String>,
}

/// Upgrade to WebSocket. A query string that does not parse is treated as
/// carrying no token; the handshake itself is never refused.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConnectQuery>, QueryRejection>,
) -> impl IntoResponse {
    let token = match query {
        Ok(Query(query)) => query.token,
        Err(rejection) => {
            tracing::warn!("Ignoring unreadable handshake query: {}", rejection);
            None
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, token))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events produced for this
/// connection (via rx channel) are written to its WebSocket in order.
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

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, token: Option<String>) {
    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    let connection = match state
        .connect_participant_usecase
        .execute(token.as_deref(), tx)
        .await
    {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };
    tracing::info!(
        "'{}' connected (authenticated: {})",
        connection.display_name(),
        connection.is_authenticated()
    );

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_clone = connection.clone();

    // Spawn a task to receive events from this connection. Events are handled
    // one at a time, so a connection's own events keep their order.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(
                        "WebSocket error on '{}': {}",
                        connection_clone.display_name(),
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&state_clone, &connection_clone, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::debug!("'{}' requested close", connection_clone.display_name());
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to write events for this connection to its socket
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&connection)
        .await;
}

/// Route one inbound frame to its use case
async fn dispatch(state: &AppState, connection: &Connection, text: &str) {
    let event = match serde_json::from_str::<ClientEventDto>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Ignoring malformed frame from '{}': {}",
                connection.display_name(),
                e
            );
            return;
        }
    };

    match event {
        ClientEventDto::JoinRoom(room_id) => {
            let Some(room_id) = parse_room_id(connection, room_id) else {
                return;
            };
            if let Err(e) = state.join_room_usecase.execute(connection, room_id).await {
                tracing::warn!("join_room for '{}' failed: {}", connection.display_name(), e);
            }
        }
        ClientEventDto::Play(payload) => {
            control_playback(state, connection, payload, |current_time| {
                PlaybackCommand::Play { current_time }
            })
            .await
        }
        ClientEventDto::Pause(payload) => {
            control_playback(state, connection, payload, |current_time| {
                PlaybackCommand::Pause { current_time }
            })
            .await
        }
        ClientEventDto::Seek(payload) => {
            control_playback(state, connection, payload, |current_time| {
                PlaybackCommand::Seek { current_time }
            })
            .await
        }
        ClientEventDto::SendMessage(fields) => {
            match state
                .send_message_usecase
                .execute(connection, ChatPayload::new(fields))
                .await
            {
                Ok(_) => {}
                Err(e @ (SendMessageError::MissingRoomId | SendMessageError::InvalidRoomId(_))) => {
                    tracing::debug!(
                        "Dropped send_message from '{}': {}",
                        connection.display_name(),
                        e
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "send_message from '{}' failed: {}",
                        connection.display_name(),
                        e
                    );
                }
            }
        }
    }
}

async fn control_playback(
    state: &AppState,
    connection: &Connection,
    payload: PlaybackPayloadDto,
    to_command: fn(f64) -> PlaybackCommand,
) {
    let Some(room_id) = parse_room_id(connection, payload.room_id) else {
        return;
    };
    let command = to_command(payload.current_time);

    match state
        .control_playback_usecase
        .execute(connection, &room_id, command)
        .await
    {
        Ok(PlaybackOutcome::Applied { .. }) | Ok(PlaybackOutcome::UnknownRoom) => {}
        Err(e) => {
            tracing::warn!(
                "{} from '{}' failed: {}",
                command.name(),
                connection.display_name(),
                e
            );
        }
    }
}

/// Convert String -> RoomId; an invalid id is treated like an unknown room
fn parse_room_id(connection: &Connection, room_id: String) -> Option<RoomId> {
    match RoomId::try_from(room_id) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            tracing::debug!(
                "Dropped event from '{}' with invalid roomId: {}",
                connection.display_name(),
                e
            );
            None
        }
    }
}
