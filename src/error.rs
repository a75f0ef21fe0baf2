/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / TokenError などを統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::PostId;
use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },

    // No principal attached to the request (anonymous access to a protected route)
    #[error("unauthorized")]
    Unauthorized,

    #[error("{user_name} is already taken")]
    DuplicatedUserName { user_name: String },

    #[error("{user_name} not found")]
    UserNotFound { user_name: String },

    #[error("password is invalid")]
    InvalidPassword,

    #[error("post {post_id} not found")]
    PostNotFound { post_id: PostId },

    #[error("{user_name} has no permission with post {post_id}")]
    InvalidPermission { user_name: String, post_id: PostId },

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::InvalidPermission { .. } => StatusCode::FORBIDDEN,
            AppError::UserNotFound { .. } | AppError::PostNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicatedUserName { .. } => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. } => code,
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::DuplicatedUserName { .. } => "DUPLICATED_USER_NAME",
            AppError::UserNotFound { .. } => "USER_NOT_FOUND",
            AppError::InvalidPassword => "INVALID_PASSWORD",
            AppError::PostNotFound { .. } => "POST_NOT_FOUND",
            AppError::InvalidPermission { .. } => "INVALID_PERMISSION",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // 5xx は詳細をクライアントに返さない (ログ側で追う)
        let message = match &self {
            AppError::Internal => "internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = %e, "repository failure");
        AppError::Internal
    }
}
