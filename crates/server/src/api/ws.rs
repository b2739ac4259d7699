//! WebSocket API 处理器包装。
//!
//! 将统一的应用状态适配到 arena_engine 的 WebSocket handler。

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::state::AppState;

/// Axum WebSocket 升级 handler，使用统一的 AppState。
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    arena_engine::ws_api::websocket_handler(ws, State(state.engine.clone())).await
}
