//! API 错误处理
//!
//! 所有失败都返回 `{"success": false, "error": "..."}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::FanoutError;

/// 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
}

/// 可转换为 HTTP 响应的 API 错误
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FanoutError> for ApiError {
    fn from(err: FanoutError) -> Self {
        match err {
            FanoutError::UnknownImportance(_) | FanoutError::UnknownChannel(_) => {
                ApiError::bad_request(err.to_string())
            }
            FanoutError::NotFound { .. } => ApiError::not_found(err.to_string()),
            // 内部失败只返回下游错误本身的消息
            FanoutError::Preference(ref message) | FanoutError::Persistence(ref message) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::internal(message.clone())
            }
        }
    }
}

/// handler 返回类型
pub type ApiResult<T> = Result<T, ApiError>;
