/*
 * Responsibility
 * - Posts の request/response DTO
 * - owner は user id と user name をまとめて返す
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Post;
use crate::services::post::PageRequest;

const TITLE_MAX_LEN: usize = 200;

fn validate_post(title: &str, body: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err("title must be <= 200 chars");
    }
    if body.trim().is_empty() {
        return Err("body is required");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_post(&self.title, &self.body)
    }
}

// PUT replaces both fields
#[derive(Debug, Deserialize)]
pub struct ModifyPostRequest {
    pub title: String,
    pub body: String,
}

impl ModifyPostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_post(&self.title, &self.body)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(q: PageQuery) -> Self {
        PageRequest::new(q.page, q.size)
    }
}

#[derive(Debug, Serialize)]
pub struct PostOwner {
    pub id: i64,
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub user: PostOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            user: PostOwner {
                id: post.owner.0,
                user_name: post.owner_name,
            },
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
}
