//! User entity and auth DTOs

use crate::auth::{Role, TokenPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Persisted user record
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned to clients, without credential material
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Requested role; defaults to viewer
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Login / register response: the user plus a token pair
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub user: UserDto,
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            username: "guest42".to_string(),
            name: "Guest".to_string(),
            password: "short".to_string(),
            role: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_dto_hides_password_hash() {
        let user = User {
            id: 7,
            username: "guest42".to_string(),
            name: "Guest".to_string(),
            password_hash: "$2b$12$abcdef".to_string(),
            role: Role::Viewer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(UserDto::from(&user)).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "guest42");
    }
}
