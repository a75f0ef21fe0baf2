/*
 * Responsibility
 * - repo row / DTO から独立したドメイン型 (User = Principal, Post)
 * - 認可判断 (所有者チェック) はこの型の canonical id だけを見る
 */
pub mod post;
pub mod user;

pub use post::{Post, PostId};
pub use user::{User, UserId, UserRole};
