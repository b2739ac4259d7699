//! 执行服务适配层。
//!
//! `ExecutionClient` trait 定义在 `arena-core` 中，这里提供面向
//! Judge0 兼容 HTTP 服务的实现。

mod http;

pub use arena_core::domain::{
    ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse, ExecutionStatus,
};
pub use http::HttpExecutionClient;
