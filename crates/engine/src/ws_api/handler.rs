use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::protocol::ServerMessage;
use crate::engine::ContestEngine;

/// Axum WebSocket 升级 handler。
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(engine): State<Arc<ContestEngine>>,
) -> impl IntoResponse {
    info!("new WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, engine))
}

async fn handle_socket(socket: WebSocket, engine: Arc<ContestEngine>) {
    let (mut sender, mut receiver) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(64);

    let writer_task = tokio::spawn(async move {
        while let Some(server_msg) = out_rx.recv().await {
            match serde_json::to_string(&server_msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    error!(error = %err, "failed to serialize WebSocket message");
                    break;
                }
            }
        }
    });

    let mut session = engine.feed_session();

    loop {
        let outgoing = tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => session.dispatch(text.as_str()),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => None,
                Some(Err(err)) => {
                    warn!(error = %err, "WebSocket receive error");
                    break;
                }
            },
            Some(update) = session.next_update() => Some(update),
        };

        if let Some(server_msg) = outgoing {
            if out_tx.send(server_msg).await.is_err() {
                break;
            }
        }
    }

    drop(session);
    drop(out_tx);
    if let Err(err) = writer_task.await {
        warn!(error = %err, "WebSocket writer task exited with join error");
    }

    info!("WebSocket connection closed");
}
