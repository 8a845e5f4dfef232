/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body `{"detail", "code"}`)
 * - AuthError を統一的に変換 (provider / identity store の失敗も AuthError 経由)
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: &'static str,
}

/// The Display text of each variant is the `detail` sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,
    #[error("Invalid token structure. Must be 'Bearer <token>'.")]
    MalformedCredential,
    #[error("Invalid or expired token.")]
    InvalidToken,
    #[error("No local user is linked to this token.")]
    UnknownUser,
    #[error("Identity provider is unavailable.")]
    ProviderUnavailable,
    #[error("Internal server error.")]
    Internal,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED"),
            AppError::MalformedCredential => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN_STRUCTURE")
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::UnknownUser => (StatusCode::UNAUTHORIZED, "UNKNOWN_USER"),
            AppError::ProviderUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            detail: self.to_string(),
            code,
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MalformedCredential => AppError::MalformedCredential,
            AuthError::InactiveOrExpired => AppError::InvalidToken,
            AuthError::UnknownPrincipal { .. } => AppError::UnknownUser,
            AuthError::ProviderUnavailable(_) => AppError::ProviderUnavailable,
            AuthError::IdentityStore(_) => AppError::Internal,
        }
    }
}
