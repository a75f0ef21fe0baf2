use chrono::{DateTime, Utc};

use crate::domain::user::UserId;

pub type PostId = i64;

/// A post. `owner` is fixed at creation; nothing in the crate rewrites it.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub owner: UserId,
    // denormalized for responses; authorization only looks at `owner`
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
