//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::repository::{UserRepository, VillaNumberRepository, VillaRepository};
use deadpool_postgres::Pool;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Database connection pool
    pub db_pool: Pool,

    /// Villa data access
    pub villas: VillaRepository,

    /// Villa number data access
    pub villa_numbers: VillaNumberRepository,

    /// Account data access
    pub users: UserRepository,

    /// JWT secret key for token signing
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(pool: Pool, jwt_secret: String) -> Self {
        Self {
            villas: VillaRepository::new(pool.clone()),
            villa_numbers: VillaNumberRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            db_pool: pool,
            jwt_secret,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
