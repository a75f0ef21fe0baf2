/*
 * Responsibility
 * - posts の create / modify / delete / list / my
 * - 変更系は必ず: identity 解決 → post 取得 (PostNotFound) → 所有者チェック → 更新
 */
use std::sync::Arc;

use crate::domain::{Post, PostId, User};
use crate::error::AppError;
use crate::repos::PostRepo;
use crate::services::auth::IdentityResolver;
use crate::services::post::ownership;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// 0-based page; size is clamped to 1..=100.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepo>,
    identities: Arc<dyn IdentityResolver>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepo>, identities: Arc<dyn IdentityResolver>) -> Self {
        Self { posts, identities }
    }

    pub async fn create(&self, title: &str, body: &str, user_name: &str) -> Result<Post, AppError> {
        let author = self.identities.resolve(user_name).await?;
        let row = self.posts.create(title, body, &author).await?;

        tracing::info!(post_id = row.post_id, user_id = %author.id, "post created");
        Ok(row.into())
    }

    pub async fn modify(
        &self,
        title: &str,
        body: &str,
        user_name: &str,
        post_id: PostId,
    ) -> Result<Post, AppError> {
        let actor = self.authorize(user_name, post_id).await?;

        let row = self
            .posts
            .update(post_id, title, body)
            .await?
            // deleted between lookup and update
            .ok_or(AppError::PostNotFound { post_id })?;

        tracing::info!(post_id, user_id = %actor.id, "post modified");
        Ok(row.into())
    }

    pub async fn delete(&self, user_name: &str, post_id: PostId) -> Result<(), AppError> {
        let actor = self.authorize(user_name, post_id).await?;

        if !self.posts.delete(post_id).await? {
            return Err(AppError::PostNotFound { post_id });
        }

        tracing::info!(post_id, user_id = %actor.id, "post deleted");
        Ok(())
    }

    pub async fn list(&self, page: PageRequest) -> Result<Vec<Post>, AppError> {
        let rows = self.posts.list(page.limit(), page.offset()).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn my(&self, user_name: &str, page: PageRequest) -> Result<Vec<Post>, AppError> {
        let user = self.identities.resolve(user_name).await?;
        let rows = self
            .posts
            .list_by_user(user.id, page.limit(), page.offset())
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    // Identity first, then the post, then the owner check. Nothing is written here.
    async fn authorize(&self, user_name: &str, post_id: PostId) -> Result<User, AppError> {
        let actor = self.identities.resolve(user_name).await?;

        let post: Post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound { post_id })?
            .into();

        ownership::ensure_owner(&post, &actor)?;
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::UserId;
    use crate::repos::post_repo::PostRow;
    use crate::repos::{InMemoryPostRepo, InMemoryUserRepo};
    use crate::repos::error::RepoResult;
    use crate::services::auth::JwtCodec;
    use crate::services::user::UserService;

    struct Fixture {
        users: Arc<UserService>,
        posts: Arc<InMemoryPostRepo>,
        service: PostService,
    }

    async fn fixture() -> Fixture {
        let jwt = Arc::new(JwtCodec::new("test-secret", 3600));
        let users = Arc::new(UserService::new(Arc::new(InMemoryUserRepo::new()), jwt));
        users.join("userName", "password").await.unwrap();
        users.join("other", "password").await.unwrap();

        let posts = Arc::new(InMemoryPostRepo::new());
        let service = PostService::new(posts.clone(), users.clone());
        Fixture {
            users,
            posts,
            service,
        }
    }

    #[tokio::test]
    async fn create_sets_owner_to_author() {
        let f = fixture().await;
        let author = f.users.load_user_by_user_name("userName").await.unwrap();

        let post = f.service.create("title", "body", "userName").await.unwrap();

        assert_eq!(post.owner, author.id);
        assert_eq!(post.owner_name, "userName");
    }

    #[tokio::test]
    async fn create_by_unknown_user_fails() {
        let f = fixture().await;

        let err = f.service.create("title", "body", "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn owner_can_modify() {
        let f = fixture().await;
        let post = f.service.create("title", "body", "userName").await.unwrap();

        let modified = f
            .service
            .modify("new title", "new body", "userName", post.id)
            .await
            .unwrap();

        assert_eq!(modified.title, "new title");
        assert_eq!(modified.body, "new body");
        assert_eq!(modified.owner, post.owner);
    }

    #[tokio::test]
    async fn non_owner_cannot_modify() {
        let f = fixture().await;
        let post = f.service.create("title", "body", "userName").await.unwrap();

        let err = f
            .service
            .modify("hijacked", "hijacked", "other", post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPermission { .. }));

        let stored = f.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "title");
    }

    #[tokio::test]
    async fn modify_of_missing_post_is_not_found_for_anyone() {
        let f = fixture().await;
        f.service.create("title", "body", "userName").await.unwrap();

        for actor in ["userName", "other"] {
            let err = f.service.modify("t", "b", actor, 999).await.unwrap_err();
            assert!(matches!(err, AppError::PostNotFound { post_id: 999 }));
        }
    }

    #[tokio::test]
    async fn modify_by_unknown_actor_fails_before_post_lookup() {
        let f = fixture().await;
        let err = f.service.modify("t", "b", "nobody", 999).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn owner_can_delete_and_others_cannot() {
        let f = fixture().await;
        let post = f.service.create("title", "body", "userName").await.unwrap();

        let err = f.service.delete("other", post.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPermission { .. }));
        assert!(f.posts.find_by_id(post.id).await.unwrap().is_some());

        f.service.delete("userName", post.id).await.unwrap();
        assert!(f.posts.find_by_id(post.id).await.unwrap().is_none());

        let err = f.service.delete("userName", post.id).await.unwrap_err();
        assert!(matches!(err, AppError::PostNotFound { .. }));
    }

    #[tokio::test]
    async fn list_and_my_feed() {
        let f = fixture().await;
        f.service.create("a", "a", "userName").await.unwrap();
        f.service.create("b", "b", "other").await.unwrap();
        f.service.create("c", "c", "userName").await.unwrap();

        let all = f.service.list(PageRequest::default()).await.unwrap();
        assert_eq!(
            all.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["c", "b", "a"]
        );

        let mine = f.service.my("userName", PageRequest::default()).await.unwrap();
        assert_eq!(
            mine.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["c", "a"]
        );
    }

    #[test]
    fn page_request_clamps_size() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 0, size: 20 });
        assert_eq!(PageRequest::new(Some(2), Some(0)).size, 1);
        assert_eq!(PageRequest::new(Some(2), Some(1000)).size, 100);
        assert_eq!(PageRequest::new(Some(2), Some(10)).offset(), 20);
    }

    // Records writes so a denied mutation can be shown to never reach the store.
    #[derive(Default)]
    struct CountingRepo {
        inner: InMemoryPostRepo,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl PostRepo for CountingRepo {
        async fn create(&self, title: &str, body: &str, author: &User) -> RepoResult<PostRow> {
            self.inner.create(title, body, author).await
        }

        async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<PostRow>> {
            self.inner.find_by_id(post_id).await
        }

        async fn update(
            &self,
            post_id: PostId,
            title: &str,
            body: &str,
        ) -> RepoResult<Option<PostRow>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update(post_id, title, body).await
        }

        async fn delete(&self, post_id: PostId) -> RepoResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(post_id).await
        }

        async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<PostRow>> {
            self.inner.list(limit, offset).await
        }

        async fn list_by_user(
            &self,
            user_id: UserId,
            limit: i64,
            offset: i64,
        ) -> RepoResult<Vec<PostRow>> {
            self.inner.list_by_user(user_id, limit, offset).await
        }
    }

    #[tokio::test]
    async fn denied_or_missing_mutations_never_write() {
        let f = fixture().await;
        let repo = Arc::new(CountingRepo::default());
        let service = PostService::new(repo.clone(), f.users.clone());
        let post = service.create("title", "body", "userName").await.unwrap();

        let _ = service.modify("t", "b", "other", post.id).await;
        let _ = service.delete("other", post.id).await;
        let _ = service.modify("t", "b", "userName", 999).await;
        let _ = service.delete("userName", 999).await;
        assert_eq!(repo.writes.load(Ordering::SeqCst), 0);

        service.modify("t", "b", "userName", post.id).await.unwrap();
        assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
    }
}
