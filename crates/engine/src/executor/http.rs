use arena_core::domain::{ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ExecutionConfig;
use crate::error::{EngineError, Result};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Judge0 兼容的同步执行客户端。
///
/// 每次调用只发起一次请求，超时由 `reqwest` 客户端统一控制，不做自动重试。
#[derive(Debug, Clone)]
pub struct HttpExecutionClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmissionBody<'a> {
    source_code: &'a str,
    language_id: i32,
    stdin: &'a str,
}

impl HttpExecutionClient {
    pub fn new(config: &ExecutionConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(EngineError::Config(
                "execution.base_url must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| EngineError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn submissions_url(&self) -> String {
        format!("{}/submissions?base64_encoded=false&wait=true", self.base_url)
    }
}

fn transport_error(err: reqwest::Error) -> ExecutionError {
    if err.is_timeout() {
        ExecutionError::Timeout
    } else {
        ExecutionError::Connection(err.to_string())
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn execute(
        &self,
        request: ExecutionRequest,
    ) -> std::result::Result<ExecutionResponse, ExecutionError> {
        let body = SubmissionBody {
            source_code: &request.source_code,
            language_id: request.language.id(),
            stdin: &request.stdin,
        };

        let mut builder = self.http.post(self.submissions_url()).json(&body);
        if let Some(token) = &self.auth_token {
            builder = builder.header(AUTH_HEADER, token);
        }

        debug!(
            language = request.language.name(),
            source_bytes = request.source_code.len(),
            "sending execution request"
        );

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "execution service rejected request");
            return Err(ExecutionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<ExecutionResponse>().await.map_err(|err| {
            if err.is_timeout() {
                ExecutionError::Timeout
            } else {
                ExecutionError::InvalidResponse(err.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(base_url: &str) -> ExecutionConfig {
        ExecutionConfig {
            base_url: base_url.to_string(),
            timeout_ms: 1_000,
            auth_token: None,
        }
    }

    #[test]
    fn submissions_url_requests_synchronous_plain_text() {
        let client = HttpExecutionClient::new(&config("http://judge0:2358/")).expect("client");

        assert_eq!(
            client.submissions_url(),
            "http://judge0:2358/submissions?base64_encoded=false&wait=true"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(matches!(
            HttpExecutionClient::new(&config("  ")),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn body_uses_wire_field_names() {
        let body = SubmissionBody {
            source_code: "print(1)",
            language_id: 71,
            stdin: "{}",
        };

        assert_eq!(
            serde_json::to_value(&body).expect("serialize"),
            json!({"source_code": "print(1)", "language_id": 71, "stdin": "{}"})
        );
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_connection_error() {
        let client = HttpExecutionClient::new(&config("http://127.0.0.1:9")).expect("client");

        let err = client
            .execute(ExecutionRequest {
                source_code: "print(1)".to_string(),
                language: arena_core::domain::Language::Python,
                stdin: String::new(),
            })
            .await
            .expect_err("nothing listens on the discard port");

        assert_eq!(err.diagnostic(), "connection error");
    }
}
