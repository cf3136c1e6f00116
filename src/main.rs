//! ResortFlow API - Villa Resort Management
//!
//! A CRUD web API for managing villas and their bookable villa
//! numbers, backed by PostgreSQL, with JWT authentication and
//! role-based authorization.
//!
//! Every endpoint answers with a uniform response envelope
//! (statusCode / isSuccess / errorMessages / result); list endpoints
//! additionally emit an X-Pagination header.

mod auth;
mod config;
mod db;
mod error;
mod models;
mod repository;
mod routes;
mod state;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🚀 Starting ResortFlow - Villa Resort Management API...");

    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("⚠️  JWT_SECRET not set, using default (INSECURE - set in production!)");
        "resortflow-dev-secret-change-in-production".to_string()
    });

    let pool = db::create_pool(&settings.database)?;
    db::check_connection(&pool).await?;
    info!("✅ Database connection successful");

    db::create_tables(&pool).await?;

    let state = Arc::new(AppState::new(pool, jwt_secret));
    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Authentication ───");
    info!("   POST   /api/auth/register       - Register new account");
    info!("   POST   /api/auth/login          - Login with username/password");
    info!("   POST   /api/auth/refresh        - Refresh access token");
    info!("   GET    /api/auth/me             - Get current user");
    info!("");
    info!("   ─── Villas ───");
    info!("   GET    /api/villas              - List (occupancy/search filters, paging)");
    info!("   GET    /api/villas/:id          - Get one");
    info!("   POST   /api/villas              - Create");
    info!("   PUT    /api/villas/:id          - Replace");
    info!("   DELETE /api/villas/:id          - Delete (admin)");
    info!("");
    info!("   ─── Villa Numbers ───");
    info!("   GET    /api/villa-numbers       - List with owning villa");
    info!("   GET    /api/villa-numbers/:id   - Get one");
    info!("   POST   /api/villa-numbers       - Create");
    info!("   PUT    /api/villa-numbers/:id   - Replace");
    info!("   DELETE /api/villa-numbers/:id   - Delete (admin)");
    info!("");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,resortflow_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
