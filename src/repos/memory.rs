/*
 * Responsibility
 * - DATABASE_URL 未設定時 (ローカル開発 / テスト) 用の in-memory repo
 * - PostgreSQL 実装と同じ意味 (id 採番、降順一覧、owner 不変) を保つ
 */
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{PostId, User, UserId, UserRole};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::post_repo::{PostRepo, PostRow};
use crate::repos::user_repo::{UserRepo, UserRow};

#[derive(Debug)]
struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    table: RwLock<Table<UserRow>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<UserRow>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|row| row.user_name == user_name)
            .cloned())
    }

    async fn create(
        &self,
        user_name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<UserRow> {
        let mut table = self.table.write().await;
        // same guarantee as the UNIQUE constraint on users."userName"
        if table.rows.values().any(|row| row.user_name == user_name) {
            return Err(RepoError::Conflict);
        }
        let id = table.next_id();
        let row = UserRow {
            id,
            user_name: user_name.to_string(),
            password: password_hash.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPostRepo {
    table: RwLock<Table<PostRow>>,
}

impl InMemoryPostRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<'a>(
    rows: impl DoubleEndedIterator<Item = &'a PostRow>,
    limit: i64,
    offset: i64,
) -> Vec<PostRow> {
    rows.rev()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl PostRepo for InMemoryPostRepo {
    async fn create(&self, title: &str, body: &str, author: &User) -> RepoResult<PostRow> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let now = Utc::now();
        let row = PostRow {
            post_id: id,
            title: title.to_string(),
            body: body.to_string(),
            user_id: author.id.0,
            user_name: author.user_name.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<PostRow>> {
        Ok(self.table.read().await.rows.get(&post_id).cloned())
    }

    async fn update(
        &self,
        post_id: PostId,
        title: &str,
        body: &str,
    ) -> RepoResult<Option<PostRow>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&post_id) else {
            return Ok(None);
        };
        row.title = title.to_string();
        row.body = body.to_string();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, post_id: PostId) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&post_id).is_some())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<PostRow>> {
        let table = self.table.read().await;
        Ok(page(table.rows.values(), limit, offset))
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<PostRow>> {
        let table = self.table.read().await;
        Ok(page(
            table.rows.values().filter(|row| row.user_id == user_id.0),
            limit,
            offset,
        ))
    }
}
