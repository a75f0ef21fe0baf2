/*
 * Responsibility
 * - join (会員登録) / login (パスワード照合 → token 発行)
 * - IdentityResolver の実装 (user name → User)
 */
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{User, UserRole};
use crate::error::AppError;
use crate::repos::UserRepo;
use crate::repos::error::RepoError;
use crate::services::auth::{IdentityResolver, JwtCodec};
use crate::services::password;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepo>,
    jwt: Arc<JwtCodec>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>, jwt: Arc<JwtCodec>) -> Self {
        Self { repo, jwt }
    }

    pub async fn join(&self, user_name: &str, password: &str) -> Result<User, AppError> {
        if self.repo.find_by_user_name(user_name).await?.is_some() {
            return Err(AppError::DuplicatedUserName {
                user_name: user_name.to_string(),
            });
        }

        let phc = password::hash_password(password)?;
        // a concurrent join may have taken the name since the check above
        let row = self
            .repo
            .create(user_name, &phc, UserRole::User)
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AppError::DuplicatedUserName {
                    user_name: user_name.to_string(),
                },
                other => other.into(),
            })?;
        let user = row.to_user()?;

        tracing::info!(user_id = %user.id, user_name = %user.user_name, "user joined");
        Ok(user)
    }

    /// Returns a signed access token for the user.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<String, AppError> {
        let row = self
            .repo
            .find_by_user_name(user_name)
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                user_name: user_name.to_string(),
            })?;

        if !password::verify_password(&row.password, password) {
            return Err(AppError::InvalidPassword);
        }

        self.jwt.encode(&row.user_name).map_err(|_| AppError::Internal)
    }

    pub async fn load_user_by_user_name(&self, user_name: &str) -> Result<User, AppError> {
        let row = self
            .repo
            .find_by_user_name(user_name)
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                user_name: user_name.to_string(),
            })?;

        Ok(row.to_user()?)
    }
}

#[async_trait]
impl IdentityResolver for UserService {
    async fn resolve(&self, user_name: &str) -> Result<User, AppError> {
        self.load_user_by_user_name(user_name).await
    }
}
