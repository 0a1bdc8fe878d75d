//! Route handler functions for all API endpoints.
//!
//! Each handler extracts the session from request extensions (installed
//! by the auth middleware), interacts with AppState services, and
//! returns JSON responses.

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use teller_chat::ChatReply;
use teller_core::types::{format_rupees, Role};
use teller_storage::{AccountRepository, AccountRow, TransactionRepository, TransactionRow, UserRepository};

use crate::error::ApiError;
use crate::sessions::{AuthUser, Session};
use crate::state::AppState;

/// Fixed payload for an empty chat message; the engine is not invoked.
const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

/// Cap on the `limit` query parameter for /transactions.
const MAX_TRANSACTIONS_LIMIT: u32 = 50;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub total: f64,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionRow>,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness check, no auth required.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /auth/login - verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = req.username.trim();
    let password = req.password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let users = UserRepository::new(Arc::clone(&state.database));
    let user = users
        .verify(username, password)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let auth_user = AuthUser {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: user.role,
    };
    let token = state.sessions.create(auth_user.clone())?;
    tracing::info!(username = %auth_user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: auth_user,
    }))
}

/// POST /auth/logout - drop the current session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<LogoutResponse> {
    let success = state.sessions.remove(&session.token);
    Json(LogoutResponse { success })
}

/// POST /chat - one chatbot turn for the current session.
///
/// Customers only. Empty input gets a fixed prompt without touching the
/// engine or the dialog state; everything else runs one engine turn and
/// stores the returned state back on the session.
pub async fn chat(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    require_customer(&session)?;

    let message = req.message.trim();
    if message.is_empty() {
        return Ok(Json(ChatReply::labeled(
            EMPTY_MESSAGE_REPLY,
            "fallback",
            "fallback",
        )));
    }

    let (reply, next_state) =
        state
            .engine
            .process(session.dialog.clone(), message, session.user.id)?;
    state.sessions.set_dialog(&session.token, next_state)?;

    Ok(Json(reply))
}

/// GET /balance - total balance across the customer's accounts.
pub async fn balance(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<BalanceResponse>, ApiError> {
    require_customer(&session)?;
    let accounts = AccountRepository::new(Arc::clone(&state.database));
    let total = accounts.balance_total(session.user.id)?;
    Ok(Json(BalanceResponse {
        formatted: format_rupees(total),
        total,
    }))
}

/// GET /transactions - most recent transactions, newest first.
pub async fn transactions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(params): Query<TransactionsParams>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    require_customer(&session)?;

    let default_limit = state
        .config
        .lock()
        .map(|c| c.chat.transactions_limit)
        .unwrap_or(5);
    let limit = params
        .limit
        .unwrap_or(default_limit)
        .clamp(1, MAX_TRANSACTIONS_LIMIT);

    let repo = TransactionRepository::new(Arc::clone(&state.database));
    let transactions = repo.last_for_user(session.user.id, limit)?;
    Ok(Json(TransactionsResponse { transactions }))
}

/// GET /accounts - the customer's accounts.
pub async fn accounts(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<AccountsResponse>, ApiError> {
    require_customer(&session)?;
    let repo = AccountRepository::new(Arc::clone(&state.database));
    let accounts = repo.list_for_user(session.user.id)?;
    Ok(Json(AccountsResponse { accounts }))
}

// -- Private helpers --

/// Customer-only gate for account and chatbot endpoints.
fn require_customer(session: &Session) -> Result<(), ApiError> {
    if session.user.role != Role::User {
        return Err(ApiError::Forbidden(
            "Available to customers only".to_string(),
        ));
    }
    Ok(())
}
