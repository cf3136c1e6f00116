//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod auth;
mod villa;
mod villa_number;

use crate::auth::auth_middleware;
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    let cors = build_cors_layer(settings);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Mutating routes require a Bearer token; reads are public
    let protected = Router::new()
        .route("/api/villas", post(villa::create_villa))
        .route("/api/villas/{id}", put(villa::update_villa))
        .route("/api/villas/{id}", delete(villa::delete_villa))
        .route("/api/villa-numbers", post(villa_number::create_villa_number))
        .route("/api/villa-numbers/{id}", put(villa_number::update_villa_number))
        .route("/api/villa-numbers/{id}", delete(villa_number::delete_villa_number))
        .route("/api/auth/me", get(auth::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Villas
        .route("/api/villas", get(villa::list_villas))
        .route("/api/villas/{id}", get(villa::get_villa))
        // Villa numbers
        .route("/api/villa-numbers", get(villa_number::list_villa_numbers))
        .route("/api/villa-numbers/{id}", get(villa_number::get_villa_number))
        // Authentication
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .merge(protected)
        .layer(middleware_stack)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    }
}

/// Health check endpoint
async fn health_check(
    axum::extract::State(state): axum::extract::State<SharedState>,
) -> axum::Json<serde_json::Value> {
    let database = match crate::db::check_connection(&state.db_pool).await {
        Ok(()) => "up",
        Err(_) => "down",
    };

    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
