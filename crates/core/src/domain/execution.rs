use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: Language,
    pub stdin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub id: i32,
    pub description: String,
}

/// Raw sandbox output. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
}

impl ExecutionResponse {
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: Some(stdout.into()),
            ..Self::default()
        }
    }

    pub fn with_compile_output(compile_output: impl Into<String>) -> Self {
        Self {
            compile_output: Some(compile_output.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("execution service unreachable: {0}")]
    Connection(String),
    #[error("execution timed out")]
    Timeout,
    #[error("execution service rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("execution service returned an unreadable response: {0}")]
    InvalidResponse(String),
}

impl ExecutionError {
    /// Diagnostic placed in `RunResult::compilation_error`.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            ExecutionError::Timeout => "execution timed out",
            _ => "connection error",
        }
    }
}

/// Sandboxed execution service. Implementations must not retry.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    async fn execute(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionResponse, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tolerates_null_fields() {
        let raw = r#"{"stdout":null,"stderr":null,"compile_output":"main.cpp:1: error","status":{"id":6,"description":"Compilation Error"}}"#;
        let response: ExecutionResponse = serde_json::from_str(raw).expect("parse response");

        assert_eq!(response.stdout, None);
        assert_eq!(response.compile_output.as_deref(), Some("main.cpp:1: error"));
        assert_eq!(response.status.map(|status| status.id), Some(6));
    }

    #[test]
    fn diagnostics_hide_transport_details() {
        assert_eq!(
            ExecutionError::Connection("dns failure".to_string()).diagnostic(),
            "connection error"
        );
        assert_eq!(ExecutionError::Timeout.diagnostic(), "execution timed out");
    }
}
