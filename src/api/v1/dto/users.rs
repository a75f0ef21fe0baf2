/*
 * Responsibility
 * - Users の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};

const USER_NAME_MAX_LEN: usize = 32;

fn validate_credentials(user_name: &str, password: &str) -> Result<(), &'static str> {
    if user_name.trim().is_empty() {
        return Err("user_name is required");
    }
    if user_name.chars().count() > USER_NAME_MAX_LEN {
        return Err("user_name must be <= 32 chars");
    }
    if password.is_empty() {
        return Err("password is required");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub user_name: String,
    pub password: String,
}

impl JoinRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_credentials(&self.user_name, &self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_credentials(&self.user_name, &self.password)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub user_name: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            user_name: user.user_name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}
