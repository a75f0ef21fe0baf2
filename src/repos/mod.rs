/*
 * Responsibility
 * - 永続化の境界 (UserRepo / PostRepo trait)
 * - PostgreSQL 実装と in-memory 実装を同じ trait の裏に置く
 */
pub mod error;
pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::{InMemoryPostRepo, InMemoryUserRepo};
pub use post_repo::{PgPostRepo, PostRepo};
pub use user_repo::{PgUserRepo, UserRepo};
