//! Authentication and authorization module
//!
//! Provides JWT-based authentication and role-based access control.

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_tokens, decode_token, refresh_tokens, Claims, TokenPair};
pub use middleware::{auth_middleware, require_role};
pub use password::{hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can browse villas and villa numbers
    Viewer,
    /// Can create and update resources
    Editor,
    /// Can additionally delete resources and manage users
    Admin,
}

impl Role {
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Editor | Role::Admin)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Viewer => write!(f, "viewer"),
            Role::Editor => write!(f, "editor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::Viewer.can_edit());
        assert!(Role::Editor.can_edit());
        assert!(!Role::Editor.can_delete());
        assert!(Role::Admin.can_edit());
        assert!(Role::Admin.can_delete());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Viewer, Role::Editor, Role::Admin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
