//! API 错误类型。

use arena_api_types::ErrorResponse;
use arena_engine::EngineError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: String,
    status: StatusCode,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(message) => ApiError {
                message,
                code: "VALIDATION_FAILED".to_string(),
                status: StatusCode::UNPROCESSABLE_ENTITY,
            },
            err @ EngineError::NotFound { .. } => ApiError {
                message: err.to_string(),
                code: "NOT_FOUND".to_string(),
                status: StatusCode::NOT_FOUND,
            },
            err => {
                error!(error = %err, "request failed");
                ApiError {
                    message: "internal error".to_string(),
                    code: "INTERNAL_ERROR".to_string(),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code, self.message));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(EngineError::validation("bad")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(EngineError::not_found("question", "q1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(EngineError::Store(anyhow::anyhow!("db down"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ApiError::from(EngineError::Store(anyhow::anyhow!("password=hunter2")));

        assert_eq!(err.message, "internal error");
    }
}
