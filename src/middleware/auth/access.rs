//! access token (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を受け取り、署名 + exp を検証し、sub (user name) から
//!   User を解決して `AuthCtx` として extensions に格納する。
//! - 失敗しても request は止めない (匿名のまま next へ流す)。
//!   拒否は handler 側の `AuthCtxExtractor` や post の所有者チェックが行う。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{IdentityResolver, JwtCodec, TokenError};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request stayed anonymous. Logged, never returned to the client.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("authorization header is missing")]
    HeaderMissing,

    #[error("authorization header is malformed")]
    HeaderMalformed,

    #[error("access token is expired")]
    TokenExpired,

    #[error(transparent)]
    TokenInvalid(#[from] TokenError),

    #[error("no user named {user_name}")]
    IdentityNotFound { user_name: String },

    #[error("identity resolution failed: {0}")]
    ResolverFault(AppError),
}

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(req.headers(), &state.jwt, state.users.as_ref()).await {
        Ok(auth_ctx) => {
            tracing::debug!(user_id = %auth_ctx.user.id, "request authenticated");
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(auth_ctx);
        }
        Err(AuthFailure::HeaderMissing) => {
            tracing::debug!("no authorization header; continuing anonymously");
        }
        Err(err) => {
            tracing::warn!(error = %err, "authentication failed; continuing anonymously");
        }
    }

    next.run(req).await
}

/// Header → token → subject → principal.
///
/// Pure with respect to the request: the caller decides what to do with the
/// result (the middleware attaches `Ok` and drops `Err`).
pub async fn authenticate(
    headers: &HeaderMap,
    jwt: &JwtCodec,
    identities: &dyn IdentityResolver,
) -> Result<AuthCtx, AuthFailure> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::HeaderMissing)?;

    let token = bearer_token(raw.to_str().map_err(|_| AuthFailure::HeaderMalformed)?)
        .ok_or(AuthFailure::HeaderMalformed)?;

    if jwt.is_expired(token) {
        // is_expired also fails closed on bad signatures; tell the two apart for the log
        return Err(match jwt.subject(token) {
            Ok(_) => AuthFailure::TokenExpired,
            Err(e) => AuthFailure::TokenInvalid(e),
        });
    }

    let user_name = jwt.subject(token)?;

    let user = identities
        .resolve(&user_name)
        .await
        .map_err(|err| match err {
            AppError::UserNotFound { user_name } => AuthFailure::IdentityNotFound { user_name },
            other => AuthFailure::ResolverFault(other),
        })?;

    Ok(AuthCtx::new(user))
}

// A header that starts with the scheme is the normal case; anything else is malformed.
fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}
