//! 统一的应用状态。

use std::sync::Arc;

use arena_engine::ContestEngine;

/// 统一的应用状态，包含所有服务共享的数据。
#[derive(Clone)]
pub struct AppState {
    /// 评分与排行榜引擎。
    pub engine: Arc<ContestEngine>,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(engine: Arc<ContestEngine>) -> Self {
        Self { engine }
    }
}
