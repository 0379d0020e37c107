//! Role-scoped WebSocket feed of domain events.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hortitech_core::Room;

use crate::events::EventBus;

#[derive(Debug, Deserialize)]
pub struct RealtimeQuery {
    pub role: Option<String>,
}

/// GET /ws?role=admin|operario
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<RealtimeQuery>,
    State(bus): State<Arc<EventBus>>,
) -> impl IntoResponse {
    let room = query.role.as_deref().and_then(Room::from_role);
    ws.on_upgrade(move |socket| handle_socket(socket, bus, room))
}

async fn handle_socket(socket: WebSocket, bus: Arc<EventBus>, room: Option<Room>) {
    let client_id = Uuid::new_v4();
    info!("Realtime client connected: {} (room: {:?})", client_id, room);

    let (mut sender, mut receiver) = socket.split();
    let mut rx = bus.subscribe();

    let mut send_task = tokio::spawn(async move {
        loop {
            let message = match rx.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Realtime client {} lagged, {} events dropped", client_id, skipped);
                    continue;
                },
                Err(RecvError::Closed) => break,
            };

            // Clients without a recognised role join no room
            let Some(room) = room else { continue };
            if !message.audience.reaches(room) {
                continue;
            }

            let payload = match serde_json::to_string(&message.event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    continue;
                },
            };

            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            if matches!(msg, Ok(Message::Close(_)) | Err(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("Realtime client disconnected: {}", client_id);
}
