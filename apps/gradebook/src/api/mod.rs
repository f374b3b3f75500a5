//! # Gradebook HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /students` - Add a student
//! - `GET /students` - List students (`?sort_by=id|name|marks&order=asc|desc`)
//! - `PUT /students/{id}` - Replace a student's name and marks
//! - `DELETE /students/{id}` - Delete a student
//! - `GET /stats` - Pass/fail counts and extrema
//! - `GET /download` - CSV export as an attachment
//! - `GET /health` - Health check
//!
//! ## Environment Variables
//!
//! - `GRADEBOOK_CORS_ORIGINS`: Comma-separated list of allowed origins (default: all origins)
//! - `GRADEBOOK_RATE_LIMIT`: Requests per second (default: unlimited)

mod error;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use error::ApiError;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `gradebook::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    create_student_handler, delete_student_handler, download_handler, health_handler,
    list_students_handler, stats_handler, update_student_handler,
};
#[allow(unused_imports)]
pub use types::{
    ErrorResponse, HealthResponse, ListParams, MessageResponse, StatsResponse, StudentJson,
    StudentRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, put},
};
use gradebook_core::{GradebookError, RecordStore, ServiceConfig, StatsEngine};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// Holds the store handle and the statistics engine built from the startup
/// configuration. Nothing in here changes after construction.
#[derive(Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<dyn RecordStore>,
    /// Statistics engine carrying the configured passing threshold.
    pub stats: StatsEngine,
}

impl AppState {
    /// Create app state over a store, taking settings from `config`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: &ServiceConfig) -> Self {
        Self {
            store,
            stats: StatsEngine::from_config(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build CORS layer from environment configuration.
///
/// Reads `GRADEBOOK_CORS_ORIGINS`:
/// - If not set or "*": allows all origins
/// - Otherwise: comma-separated list of allowed origins, falling back to
///   localhost only when none of them parse
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("GRADEBOOK_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        None | Some("*") => {
            tracing::info!("CORS: Allowing all origins");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in GRADEBOOK_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
///
/// Port 5500 is where static front ends are commonly served during development.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://localhost:5500",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
        "http://127.0.0.1:5500",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - global request quota (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/students",
            get(handlers::list_students_handler).post(handlers::create_student_handler),
        )
        .route(
            "/students/{id}",
            put(handlers::update_student_handler).delete(handlers::delete_student_handler),
        )
        .route("/stats", get(handlers::stats_handler))
        .route("/download", get(handlers::download_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Resolve when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(
    config: &ServiceConfig,
    store: Arc<dyn RecordStore>,
) -> Result<(), GradebookError> {
    let state = AppState::new(store, config);
    let router = create_router(state);
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GradebookError::Io(format!("Bind failed on {}: {}", addr, e)))?;

    tracing::info!(
        passing_threshold = config.passing_threshold,
        "Gradebook HTTP server listening on {}",
        addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GradebookError::Io(format!("Server error: {}", e)))
}
