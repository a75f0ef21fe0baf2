/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - jwt: JwtCodec, users: UserService, posts: PostService
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - request ごとの認証情報 (AuthCtx) はここに置かない (request extensions 側)
 */
use std::sync::Arc;

use crate::repos::{PostRepo, UserRepo};
use crate::services::{auth::JwtCodec, post::PostService, user::UserService};

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtCodec>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Wire services over the given stores; the user service doubles as the identity resolver.
    pub fn new(jwt: JwtCodec, users: Arc<dyn UserRepo>, posts: Arc<dyn PostRepo>) -> Self {
        let jwt = Arc::new(jwt);
        let user_service = Arc::new(UserService::new(users, jwt.clone()));
        let post_service = Arc::new(PostService::new(posts, user_service.clone()));

        Self {
            jwt,
            users: user_service,
            posts: post_service,
        }
    }
}
