use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{info, warn};

use crate::engine::projection::MapSnapshot;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn encode(snapshot: &MapSnapshot) -> Option<Message> {
    match serde_json::to_string(snapshot) {
        Ok(json) => Some(Message::Text(json)),
        Err(err) => {
            warn!(error = %err, "failed to serialize snapshot for ws");
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut snapshots = BroadcastStream::new(state.snapshot_tx.subscribe());
    let current = state.snapshot().await;

    info!("websocket client connected");

    let send_task = tokio::spawn(async move {
        if let Some(message) = encode(&current) {
            if sender.send(message).await.is_err() {
                return;
            }
        }

        while let Some(next) = snapshots.next().await {
            let snapshot = match next {
                Ok(snapshot) => snapshot,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "ws client lagging; dropped snapshots");
                    continue;
                }
            };

            let Some(message) = encode(&snapshot) else {
                continue;
            };

            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("websocket client disconnected");
}
