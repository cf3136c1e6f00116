//! JWT token management
//!
//! Handles creation, validation, and refresh of JWT tokens. The
//! signing secret lives in application state and is passed in by the
//! caller.

use crate::auth::Role;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access token expiration (15 minutes)
const ACCESS_TOKEN_EXPIRATION_MINUTES: i64 = 15;

/// Refresh token expiration (7 days)
const REFRESH_TOKEN_EXPIRATION_DAYS: i64 = 7;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i32,
    /// Username
    pub username: String,
    /// User role
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Token pair response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Create access and refresh tokens for a user
pub fn create_tokens(
    secret: &str,
    user_id: i32,
    username: &str,
    role: Role,
) -> Result<TokenPair, AppError> {
    let now = Utc::now();

    let access_claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (now + Duration::minutes(ACCESS_TOKEN_EXPIRATION_MINUTES)).timestamp(),
        iat: now.timestamp(),
        token_type: TokenType::Access,
    };

    let access_token = encode(
        &Header::default(),
        &access_claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create access token: {}", e)))?;

    let refresh_claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (now + Duration::days(REFRESH_TOKEN_EXPIRATION_DAYS)).timestamp(),
        iat: now.timestamp(),
        token_type: TokenType::Refresh,
    };

    let refresh_token = encode(
        &Header::default(),
        &refresh_claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create refresh token: {}", e)))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRATION_MINUTES * 60,
    })
}

/// Decode and validate a JWT token
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AppError::Unauthorized("Invalid token".to_string())
        }
        _ => AppError::Unauthorized(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Refresh tokens using a valid refresh token
pub fn refresh_tokens(secret: &str, refresh_token: &str) -> Result<TokenPair, AppError> {
    let claims = decode_token(secret, refresh_token)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized(
            "Invalid token type for refresh".to_string(),
        ));
    }

    create_tokens(secret, claims.sub, &claims.username, claims.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_round_trip() {
        let pair = create_tokens(SECRET, 7, "guest42", Role::Editor).unwrap();
        let claims = decode_token(SECRET, &pair.access_token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "guest42");
        assert_eq!(claims.role, Role::Editor);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = create_tokens(SECRET, 7, "guest42", Role::Viewer).unwrap();
        assert!(decode_token("another-secret", &pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_requires_refresh_token() {
        let pair = create_tokens(SECRET, 7, "guest42", Role::Viewer).unwrap();

        // Access token must not be usable for refresh
        assert!(refresh_tokens(SECRET, &pair.access_token).is_err());
        assert!(refresh_tokens(SECRET, &pair.refresh_token).is_ok());
    }
}
