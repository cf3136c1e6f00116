//! Authentication middleware
//!
//! Extracts and validates JWT tokens from requests.

use crate::auth::{decode_token, Claims, Role};
use crate::error::AppError;
use crate::state::SharedState;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Validate the Bearer token and stash the claims in request extensions
pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let claims = decode_token(&state.jwt_secret, token)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require a specific role
pub fn require_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    let has_permission = match required {
        Role::Viewer => true,
        Role::Editor => claims.role.can_edit(),
        Role::Admin => claims.role.can_delete(),
    };

    if !has_permission {
        return Err(AppError::Forbidden(format!(
            "Requires {} role, you have {}",
            required, claims.role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    fn claims_for(role: Role) -> Claims {
        Claims {
            sub: 1,
            username: "guest42".to_string(),
            role,
            exp: 0,
            iat: 0,
            token_type: TokenType::Access,
        }
    }

    #[test]
    fn test_viewer_cannot_delete() {
        assert!(require_role(&claims_for(Role::Viewer), Role::Admin).is_err());
    }

    #[test]
    fn test_editor_can_edit_but_not_delete() {
        assert!(require_role(&claims_for(Role::Editor), Role::Editor).is_ok());
        assert!(require_role(&claims_for(Role::Editor), Role::Admin).is_err());
    }

    #[test]
    fn test_admin_can_do_everything() {
        assert!(require_role(&claims_for(Role::Admin), Role::Viewer).is_ok());
        assert!(require_role(&claims_for(Role::Admin), Role::Editor).is_ok());
        assert!(require_role(&claims_for(Role::Admin), Role::Admin).is_ok());
    }
}
