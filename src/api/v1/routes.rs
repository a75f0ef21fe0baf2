/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /users, /posts
 * - 認証が必要かどうかは handler の AuthCtxExtractor の有無で決まる
 *   (access middleware は v1 全体に掛かり、失敗しても素通しする)
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    posts::{create_post, delete_post, list_posts, modify_post, my_posts},
    users::{join, login, me},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users/join", post(join))
        .route("/users/login", post(login))
        .route("/users/me", get(me))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/my", get(my_posts))
        .route("/posts/{post_id}", put(modify_post).delete(delete_post))
}
