//! Database connection management
//!
//! Handles connection pooling and schema bootstrap.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

/// Create a connection pool with the given configuration
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
}

/// Verify the pool can reach the database
pub async fn check_connection(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;
    Ok(())
}

/// Create application tables if they don't exist
pub async fn create_tables(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS villas (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                details TEXT,
                rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                sqft INTEGER NOT NULL,
                occupancy INTEGER NOT NULL,
                image_url TEXT,
                amenity TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            &[],
        )
        .await?;

    // Backs the case-insensitive duplicate-name pre-check; closes the
    // check-then-act window between concurrent creates.
    client
        .execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_villas_name_lower
             ON villas (lower(name))",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS villa_numbers (
                villa_no INTEGER PRIMARY KEY,
                villa_id INTEGER NOT NULL REFERENCES villas(id),
                special_details TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            &[],
        )
        .await?;

    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_villa_numbers_villa_id
             ON villa_numbers(villa_id)",
            &[],
        )
        .await;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username VARCHAR(50) UNIQUE NOT NULL,
                name VARCHAR(100) NOT NULL,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'viewer',
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            &[],
        )
        .await?;

    info!("Database tables initialized");
    Ok(())
}
