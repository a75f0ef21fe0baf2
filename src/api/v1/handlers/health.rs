/*
 * Responsibility
 * - GET /api/v1/health (疎通用)
 * - 認証不要。access middleware は通るが AuthCtx を要求しない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
