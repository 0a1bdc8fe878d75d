//! Router assembly.
//!
//! Splits the surface into public routes (health, login) and protected
//! routes behind bearer-session auth and rate limiting, then stacks the
//! shared middleware: CORS for localhost, request tracing, gzip, body
//! limits.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use teller_core::error::TellerError;

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Requests per second admitted across the protected routes.
const RATE_LIMIT_PER_SEC: u64 = 100;

/// Body cap for chat turns. The global cap still applies elsewhere.
const CHAT_BODY_LIMIT: usize = 64 * 1024;

/// Assemble the full router over the given state.
pub fn create_router(state: AppState) -> Router {
    let port = state.config.lock().map(|c| c.general.port).unwrap_or(4040);

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/login", post(handlers::login));

    let limiter = RateLimiter::new(RATE_LIMIT_PER_SEC);
    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route(
            "/chat",
            post(handlers::chat).layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT)),
        )
        .route("/balance", get(handlers::balance))
        .route("/transactions", get(handlers::transactions))
        .route("/accounts", get(handlers::accounts))
        .layer(axum::middleware::from_fn(
            crate::rate_limit::rate_limit_middleware,
        ))
        .layer(axum::Extension(limiter))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_session,
        ));

    public
        .merge(protected)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_for_port(port))
        .with_state(state)
}

/// CORS for a local dashboard or chat widget: the configured port plus
/// port+1 for a dev server, on both localhost spellings.
fn cors_for_port(port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{p}"),
                format!("http://localhost:{p}"),
            ]
        })
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Bind to localhost on the configured port and serve until shutdown.
pub async fn start_server(state: AppState) -> Result<(), TellerError> {
    let port = state.config.lock().map(|c| c.general.port).unwrap_or(4040);
    let addr = format!("127.0.0.1:{}", port);

    tracing::info!(%addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TellerError::Api(format!("Cannot bind {}: {}", addr, e)))?;

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| TellerError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
