/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックや identity 解決は middleware/services 側の責務
 * - request ごとに作られ、request と一緒に捨てられる (request 間で共有しない)
 */

use crate::domain::User;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user` は token の subject から解決した Principal
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user: User,
}

impl AuthCtx {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_name(&self) -> &str {
        &self.user.user_name
    }
}
