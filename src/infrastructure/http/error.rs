//! HTTP Error Handling
//!
//! 所有错误都以 HTTP 200 + 统一信封 `{errno, error, data}` 返回

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::ApiResponse;
use crate::application::ApplicationError;

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = self.message();

        match &self {
            ApiError::NotFound(_) => {
                tracing::warn!(errno, error = %msg, "Resource not found");
            }
            ApiError::BadRequest(_) => {
                tracing::warn!(errno, error = %msg, "Bad request");
            }
            ApiError::Conflict(_) => {
                tracing::warn!(errno, error = %msg, "Resource conflict");
            }
            ApiError::Internal(_) => {
                tracing::error!(errno, error = %msg, "Internal server error");
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno, error = %msg, "Service unavailable");
            }
        }

        let body = ApiResponse::<()>::error(errno, msg);
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::BusinessRuleViolation(msg) => ApiError::Conflict(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::not_found("Project", Uuid::nil()), 404),
            (ApplicationError::validation("bad"), 400),
            (ApplicationError::business_rule("第1章已存在"), 409),
            (ApplicationError::external("HTTP 429"), 503),
            (ApplicationError::internal("boom"), 500),
        ];

        for (app_error, expected) in cases {
            assert_eq!(ApiError::from(app_error).errno(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_is_enveloped_with_http_200() {
        let response = ApiError::Conflict("第2章已存在".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["errno"], 409);
        assert_eq!(json["error"], "第2章已存在");
        assert!(json["data"].is_null());
    }
}
