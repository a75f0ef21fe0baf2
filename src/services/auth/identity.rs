/*
 * Responsibility
 * - token の subject (user name) → Principal (User) の解決契約
 * - 実装は user directory 側 (UserService)。ここは「型（契約）」だけを置く
 */
use async_trait::async_trait;

use crate::domain::User;
use crate::error::AppError;

/// Resolves the identity claim of a verified token into a principal.
///
/// Returns:
/// - `Ok(user)` when exactly one principal has this name
/// - `Err(AppError::UserNotFound { .. })` when none does
/// - any other `Err` for backend failures
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, user_name: &str) -> Result<User, AppError>;
}
