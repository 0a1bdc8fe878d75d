//! Session token authentication.
//!
//! Login issues a random bearer token mapped to a server-side session;
//! protected routes validate `Authorization: Bearer <token>` and make
//! the session available to handlers via request extensions.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;

use crate::state::AppState;

/// Generate a random 32-character hex session token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

/// Middleware that validates the session token.
///
/// On success the resolved [`crate::sessions::Session`] is inserted into
/// request extensions. Returns 401 for missing, malformed, unknown, or
/// expired tokens.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    let token = match header.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() => token,
        _ => {
            return unauthorized("Missing or malformed Authorization header");
        }
    };

    match state.sessions.get(token) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => unauthorized("Invalid or expired session token"),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}
