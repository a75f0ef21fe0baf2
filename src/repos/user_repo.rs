/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り find/create を提供
 * - DB エラーは RepoError に変換しやすい形で返す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::{User, UserId, UserRole};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: i64,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    // argon2 PHC string
    pub password: String,
    pub role: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn to_user(&self) -> RepoResult<User> {
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(RepoError::InvalidData)?;

        Ok(User {
            id: UserId(self.id),
            user_name: self.user_name.clone(),
            role,
        })
    }
}

/// User directory used by join/login and identity resolution.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<UserRow>>;

    async fn create(
        &self,
        user_name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<UserRow>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", password, role, "createdAt"
            FROM users
            WHERE "userName" = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(
        &self,
        user_name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users ("userName", password, role)
            VALUES ($1, $2, $3)
            RETURNING "userId", "userName", password, role, "createdAt"
            "#,
        )
        .bind(user_name)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}
