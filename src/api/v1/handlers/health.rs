/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証パイプラインの外に置く (KEYCLOAK_EXEMPT_URIS の確認にも使える)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
