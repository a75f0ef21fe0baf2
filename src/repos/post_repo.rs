/*
 * Responsibility
 * - posts CRUD
 * - "userId" の FK (CASCADE) 前提で削除挙動を意識
 * - 返す行には users."userName" を JOIN して載せる (レスポンス用)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Post, PostId, User, UserId};
use crate::repos::error::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    pub title: String,
    pub body: String,

    #[sqlx(rename = "userId")]
    pub user_id: i64,

    #[sqlx(rename = "userName")]
    pub user_name: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.post_id,
            title: row.title,
            body: row.body,
            owner: UserId(row.user_id),
            owner_name: row.user_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Resource store for posts.
///
/// `update` never touches the owner column.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, title: &str, body: &str, author: &User) -> RepoResult<PostRow>;

    async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<PostRow>>;

    async fn update(&self, post_id: PostId, title: &str, body: &str)
    -> RepoResult<Option<PostRow>>;

    async fn delete(&self, post_id: PostId) -> RepoResult<bool>;

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<PostRow>>;

    async fn list_by_user(&self, user_id: UserId, limit: i64, offset: i64)
    -> RepoResult<Vec<PostRow>>;
}

#[derive(Clone, Debug)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn create(&self, title: &str, body: &str, author: &User) -> RepoResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, body, "userId")
                VALUES ($1, $2, $3)
                RETURNING "postId", title, body, "userId", "createdAt", "updatedAt"
            )
            SELECT
                i."postId", i.title, i.body, i."userId", u."userName", i."createdAt", i."updatedAt"
            FROM inserted i
            JOIN users u ON u."userId" = i."userId"
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(author.id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p."postId", p.title, p.body, p."userId", u."userName", p."createdAt", p."updatedAt"
            FROM posts p
            JOIN users u ON u."userId" = p."userId"
            WHERE p."postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        post_id: PostId,
        title: &str,
        body: &str,
    ) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET
                    title = $2,
                    body = $3,
                    "updatedAt" = now()
                WHERE "postId" = $1
                RETURNING "postId", title, body, "userId", "createdAt", "updatedAt"
            )
            SELECT
                p."postId", p.title, p.body, p."userId", u."userName", p."createdAt", p."updatedAt"
            FROM updated p
            JOIN users u ON u."userId" = p."userId"
            "#,
        )
        .bind(post_id)
        .bind(title)
        .bind(body)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, post_id: PostId) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p."postId", p.title, p.body, p."userId", u."userName", p."createdAt", p."updatedAt"
            FROM posts p
            JOIN users u ON u."userId" = p."userId"
            ORDER BY p."postId" DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p."postId", p.title, p.body, p."userId", u."userName", p."createdAt", p."updatedAt"
            FROM posts p
            JOIN users u ON u."userId" = p."userId"
            WHERE p."userId" = $1
            ORDER BY p."postId" DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.0)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
