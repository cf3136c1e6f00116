//! User repository
//!
//! Bespoke data access for accounts. Users sit outside the generic
//! repository: their queries are credential-shaped (unique username,
//! hash verification) rather than filter-shaped.

use crate::auth::{hash_password, Role};
use crate::error::AppError;
use crate::models::User;
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;

const USER_COLUMNS: &str = "id, username, name, password_hash, role, created_at, updated_at";

fn user_from_row(row: &Row) -> Result<User, AppError> {
    let role_str: String = row.try_get("role")?;
    let role = role_str
        .parse::<Role>()
        .map_err(|e| AppError::Internal(format!("Corrupt role in store: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        role,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool,
}

impl UserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// True when no account holds this username
    pub async fn is_unique_user(&self, username: &str) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT 1 FROM users WHERE username = $1", &[&username])
            .await?;
        Ok(row.is_none())
    }

    /// Create an account with a hashed password
    pub async fn register(
        &self,
        username: &str,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        if !self.is_unique_user(username).await? {
            return Err(AppError::Conflict("Username already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO users (username, name, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &username,
                    &name,
                    &password_hash,
                    &role.to_string(),
                    &now,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::Conflict("Username already registered".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        user_from_row(&row)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let client = self.pool.get().await?;
        let row = client.query_opt(sql.as_str(), &[&username]).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let client = self.pool.get().await?;
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        row.as_ref().map(user_from_row).transpose()
    }
}
