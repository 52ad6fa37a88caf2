use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    websocket::types::{ClientMessage, ErrorPayload, SubscriptionPayload, WsMessage},
};

use super::connection::WsSender;

/// Live-subscription WebSocket.
///
/// A client subscribes to a group and receives the full current entry
/// snapshot immediately, then again after every new entry. Pending members
/// cannot subscribe.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    state.ws_connections.add_connection(user_id, tx.clone());

    // Task: send messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Task: receive messages from WebSocket
    let state_clone = state.clone();
    let tx_clone = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                if let Err(e) =
                    process_client_message(&text, user_id, &state_clone, &tx_clone).await
                {
                    tracing::debug!("Error processing ws message: {:?}", e);
                    let _ = tx_clone.send(WsMessage::Error(ErrorPayload {
                        message: e.to_string(),
                    }));
                }
            } else if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Heartbeat task
    let tx_heartbeat = tx.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            if tx_heartbeat.send(WsMessage::Ping).is_err() {
                break;
            }
        }
    });

    // Stop all tasks when any one finishes
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut recv_task => {
            send_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut heartbeat_task => {
            send_task.abort();
            recv_task.abort();
        }
    }

    state.ws_connections.remove_connection(&user_id);
    tracing::info!("WebSocket closed for user {}", user_id);
}

async fn process_client_message(
    text: &str,
    user_id: Uuid,
    state: &AppState,
    tx: &WsSender,
) -> Result<()> {
    let client_msg: ClientMessage = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("Invalid message format: {}", e)))?;

    match client_msg {
        ClientMessage::Subscribe { group_id } => {
            // Pending members see the waiting screen, not the diary.
            state
                .group_service
                .require_approved_member(&group_id, user_id)
                .await?;

            state.ws_connections.subscribe(&group_id, user_id);
            let _ = tx.send(WsMessage::Subscribed(SubscriptionPayload {
                group_id: group_id.clone(),
            }));

            // Initial delivery: the full current snapshot.
            let snapshot = state.entry_service.snapshot(&group_id).await?;
            let _ = tx.send(snapshot);
        }

        ClientMessage::Unsubscribe { group_id } => {
            state.ws_connections.unsubscribe(&group_id, &user_id);
            let _ = tx.send(WsMessage::Unsubscribed(SubscriptionPayload { group_id }));
        }

        ClientMessage::Ping => {
            let _ = tx.send(WsMessage::Pong);
        }
    }

    Ok(())
}
