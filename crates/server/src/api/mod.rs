//! API 路由模块。
//!
//! 提供评测、进度保存与排行榜相关的 HTTP 接口，以及排行榜推送的 WebSocket 入口。

pub mod contests;
pub mod error;
pub mod state;
pub mod ws;

use std::sync::Arc;

use arena_api_types::HealthCheckResponse;
use axum::{Json, Router, routing::get};
use tower_http::cors::CorsLayer;

pub use contests::create_contest_router;
pub use error::ApiError;
pub use state::AppState;
pub use ws::websocket_handler;

/// 组装完整的应用路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(websocket_handler))
        .merge(create_contest_router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
