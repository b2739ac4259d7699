//! WebSocket API 模块。协议类型始终可用，axum handler 仅在 `ws-api`
//! feature 启用时编译。

#[cfg(feature = "ws-api")]
mod handler;
mod protocol;

#[cfg(feature = "ws-api")]
pub use handler::websocket_handler;
pub use protocol::{ClientMessage, LeaderboardPayload, ServerMessage, SubscribePayload};
