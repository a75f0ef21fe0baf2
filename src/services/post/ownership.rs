/*
 * Responsibility
 * - 変更系操作 (modify / delete) の前に必ず通す所有者チェック
 * - post.owner と acting principal の canonical id (UserId) だけを比較する
 *   (user name や struct の中身同士は比べない)
 * - role による override は無い
 */
use crate::domain::{Post, User, UserId};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Allowed,
    Denied,
}

pub fn decide(owner: UserId, acting: &User) -> Ownership {
    if owner == acting.id {
        Ownership::Allowed
    } else {
        Ownership::Denied
    }
}

/// `Denied` becomes `InvalidPermission`, naming the actor and the post.
pub fn ensure_owner(post: &Post, acting: &User) -> Result<(), AppError> {
    match decide(post.owner, acting) {
        Ownership::Allowed => Ok(()),
        Ownership::Denied => {
            tracing::warn!(
                user_id = %acting.id,
                user_name = %acting.user_name,
                post_id = post.id,
                owner_id = %post.owner,
                "mutation denied: not the owner"
            );
            Err(AppError::InvalidPermission {
                user_name: acting.user_name.clone(),
                post_id: post.id,
            })
        }
    }
}
