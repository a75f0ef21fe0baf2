/*
 * Responsibility
 * - /users 系 handler (join / login / me)
 * - Json を extractor で受け、DTO validation → UserService 呼び出し
 * - me だけ AuthCtxExtractor で認証必須
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::users::{JoinRequest, LoginRequest, LoginResponse, UserResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn join(
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER", msg))?;

    let user = state.users.join(req.user_name.trim(), &req.password).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER", msg))?;

    let token = state.users.login(req.user_name.trim(), &req.password).await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.ttl_seconds(),
    }))
}

pub async fn me(AuthCtxExtractor(auth): AuthCtxExtractor) -> Json<UserResponse> {
    Json(auth.user.into())
}
