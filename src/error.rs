use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::database::RepoError;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug)]
pub enum AppError {
    /// 必填字段缺失或为空
    Validation(String),
    /// 受保护操作缺少会话
    Unauthorized,
    InvalidCredentials,
    /// 有会话但不是资源所有者
    Forbidden,
    NotFound(&'static str),
    Conflict(String),
    /// 详细信息只写日志，不返回给客户端
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::NotFound(what) => AppError::NotFound(what),
            RepoError::Forbidden => AppError::Forbidden,
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::InvalidCredentials => AppError::InvalidCredentials,
            other => AppError::Internal(other.to_string()),
        }
    }
}

// 请求体不是合法 JSON 时按校验错误处理
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "Unauthorized".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "Invalid credentials".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "Forbidden".to_string(),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                format!("{} not found", what),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, error_codes::USER_EXISTS, msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, error_to_api_response::<()>(code, error_message)).into_response()
    }
}
