//! Integration tests for the Teller API.
//!
//! Covers authentication scenarios, role gates, the account endpoints,
//! and full multi-turn chatbot conversations driven over HTTP. Each test
//! builds its own in-memory state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use teller_api::create_router;
use teller_api::state::AppState;
use teller_core::config::TellerConfig;
use teller_core::types::Role;
use teller_nlu::NluEngine;
use teller_storage::{
    password, AccountRepository, Database, TransactionRepository, TxnKind, UserRepository,
};

// =============================================================================
// Helpers
// =============================================================================

const CUSTOMER_BALANCE: f64 = 12500.0;

/// Create a fresh AppState with an in-memory DB, one customer with an
/// account and transactions, and one manager.
fn make_state() -> AppState {
    let config = TellerConfig::default();
    let db = Database::in_memory().unwrap();
    let nlu = NluEngine::from_config(&config.nlu).unwrap();
    let state = AppState::new(config, db, nlu);

    let users = UserRepository::new(Arc::clone(&state.database));
    let accounts = AccountRepository::new(Arc::clone(&state.database));
    let txns = TransactionRepository::new(Arc::clone(&state.database));

    let uid = users
        .insert(
            "user01",
            "User 01",
            Role::User,
            &password::hash("User01@123").unwrap(),
        )
        .unwrap();
    let acct = accounts.insert(uid, "SB000101", CUSTOMER_BALANCE).unwrap();
    txns.insert(acct, "2024-03-01T10:00:00", "UPI Payment", 450.0, TxnKind::Debit)
        .unwrap();
    txns.insert(acct, "2024-03-02T10:00:00", "Salary Credit", 5000.0, TxnKind::Credit)
        .unwrap();
    txns.insert(acct, "2024-03-03T10:00:00", "Bill Payment", 799.0, TxnKind::Debit)
        .unwrap();

    users
        .insert(
            "manager01",
            "Priya Manager",
            Role::Manager,
            &password::hash("Manager@123").unwrap(),
        )
        .unwrap();

    state
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Log in and return the session token.
async fn login(state: &AppState, username: &str, pass: &str) -> String {
    let app = create_router(state.clone());
    let body = serde_json::json!({ "username": username, "password": pass }).to_string();
    let resp = app
        .oneshot(
            Request::post("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "login should succeed");
    let json = body_json(resp).await;
    json["token"].as_str().unwrap().to_string()
}

/// Send one chat turn and return (status, body).
async fn chat_turn(state: &AppState, token: &str, message: &str) -> (StatusCode, Value) {
    let app = create_router(state.clone());
    let body = serde_json::json!({ "message": message }).to_string();
    let resp = app
        .oneshot(
            Request::post("/chat")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let json = body_json(resp).await;
    (status, json)
}

/// Build a GET request with auth header.
fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let app = create_router(make_state());
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_router(make_state());
    let resp = app
        .oneshot(Request::get("/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_happy_path() {
    let state = make_state();
    let app = create_router(state.clone());
    let body = serde_json::json!({ "username": "user01", "password": "User01@123" }).to_string();
    let resp = app
        .oneshot(
            Request::post("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["user"]["username"], "user01");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["token"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = create_router(make_state());
    let body = serde_json::json!({ "username": "user01", "password": "nope" }).to_string();
    let resp = app
        .oneshot(
            Request::post("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_login_unknown_user_returns_401() {
    let app = create_router(make_state());
    let body = serde_json::json!({ "username": "ghost", "password": "x" }).to_string();
    let resp = app
        .oneshot(
            Request::post("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_empty_fields_returns_400() {
    let app = create_router(make_state());
    let body = serde_json::json!({ "username": "  ", "password": "" }).to_string();
    let resp = app
        .oneshot(
            Request::post("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Auth scenarios on protected endpoints
// =============================================================================

#[tokio::test]
async fn test_auth_missing_token_returns_401() {
    let protected = ["/balance", "/transactions", "/accounts"];
    for path in protected {
        let app = create_router(make_state());
        let resp = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "Expected 401 for GET {}",
            path
        );
    }

    for path in ["/chat", "/auth/logout"] {
        let app = create_router(make_state());
        let resp = app
            .oneshot(
                Request::post(path)
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "Expected 401 for POST {}",
            path
        );
    }
}

#[tokio::test]
async fn test_auth_invalid_token_returns_401() {
    let app = create_router(make_state());
    let resp = app
        .oneshot(authed_get("/balance", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_malformed_header_returns_401() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    // Missing "Bearer " prefix.
    let app = create_router(state);
    let resp = app
        .oneshot(
            Request::get("/balance")
                .header("authorization", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    let app = create_router(state.clone());
    let resp = app
        .oneshot(
            Request::post("/auth/logout")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);

    // Token no longer works.
    let app = create_router(state);
    let resp = app.oneshot(authed_get("/balance", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Role gates
// =============================================================================

#[tokio::test]
async fn test_chat_forbidden_for_staff() {
    let state = make_state();
    let token = login(&state, "manager01", "Manager@123").await;
    let (status, json) = chat_turn(&state, &token, "hello").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_balance_forbidden_for_staff() {
    let state = make_state();
    let token = login(&state, "manager01", "Manager@123").await;
    let app = create_router(state);
    let resp = app.oneshot(authed_get("/balance", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Account endpoints
// =============================================================================

#[tokio::test]
async fn test_balance_endpoint() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let app = create_router(state);
    let resp = app.oneshot(authed_get("/balance", &token)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["total"], CUSTOMER_BALANCE);
    assert_eq!(json["formatted"], "₹ 12,500.00");
}

#[tokio::test]
async fn test_transactions_endpoint_newest_first() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let app = create_router(state);
    let resp = app
        .oneshot(authed_get("/transactions", &token))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let txns = json["transactions"].as_array().unwrap();
    assert_eq!(txns.len(), 3);
    assert_eq!(txns[0]["description"], "Bill Payment");
    assert_eq!(txns[0]["type"], "debit");
    assert_eq!(txns[2]["description"], "UPI Payment");
}

#[tokio::test]
async fn test_transactions_endpoint_limit() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let app = create_router(state);
    let resp = app
        .oneshot(authed_get("/transactions?limit=1", &token))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_accounts_endpoint() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let app = create_router(state);
    let resp = app.oneshot(authed_get("/accounts", &token)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let accounts = json["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["account_number"], "SB000101");
}

// =============================================================================
// Chat: basics
// =============================================================================

#[tokio::test]
async fn test_chat_empty_message_fixed_reply() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let (status, json) = chat_turn(&state, &token, "   ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "Please type a message.");
    assert_eq!(json["intent"], "fallback");
    assert_eq!(json["entity"], "fallback");
}

#[tokio::test]
async fn test_chat_greeting() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let (status, json) = chat_turn(&state, &token, "hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "greet");
    assert_eq!(json["entity"], "greet");
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_message_too_long_returns_400() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let long = "a".repeat(2001);
    let (status, json) = chat_turn(&state, &token, &long).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_chat_fallback_for_off_topic_message() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let (status, json) = chat_turn(&state, &token, "sing me a song about the weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "fallback");
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_last_transactions_keyword() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let (status, json) = chat_turn(&state, &token, "show my last transactions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "last_transactions");
    assert_eq!(json["action"], "show_transactions");
    let txns = json["transactions"].as_array().unwrap();
    assert_eq!(txns.len(), 3);
    assert_eq!(txns[0]["description"], "Bill Payment");
}

// =============================================================================
// Chat: multi-turn dialogs
// =============================================================================

#[tokio::test]
async fn test_chat_end_to_end_balance_scenario() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    // Greeting leaves the session idle.
    let (_, json) = chat_turn(&state, &token, "hi").await;
    assert_eq!(json["intent"], "greet");

    // Balance question opens the dialog.
    let (_, json) = chat_turn(&state, &token, "what's my balance").await;
    assert_eq!(json["intent"], "balance_check");
    assert!(json["reply"].as_str().unwrap().contains("account number"));

    // A miss re-prompts.
    let (_, json) = chat_turn(&state, &token, "abc").await;
    assert_eq!(json["intent"], "ask_account_number");
    assert_eq!(json["entity"], "account_number");

    // The account number completes the dialog with the stored total.
    let (_, json) = chat_turn(&state, &token, "acct 998877").await;
    let reply = json["reply"].as_str().unwrap();
    assert!(reply.contains("998877"));
    assert!(reply.contains("12,500.00"));
    assert_eq!(json["action"], "show_balance");

    // Dialog is closed: a greeting routes fresh again.
    let (_, json) = chat_turn(&state, &token, "hello").await;
    assert_eq!(json["intent"], "greet");
}

#[tokio::test]
async fn test_chat_balance_dialog_abandoned_after_three_misses() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    chat_turn(&state, &token, "check balance").await;
    let (_, first) = chat_turn(&state, &token, "umm").await;
    assert_eq!(first["intent"], "ask_account_number");
    let (_, second) = chat_turn(&state, &token, "not sure").await;
    assert_eq!(second["intent"], "ask_account_number");
    let (_, third) = chat_turn(&state, &token, "no idea").await;
    assert!(third["reply"].as_str().unwrap().contains("Please try later"));
    assert_eq!(third["intent"], "fallback");

    // Back to idle: greeting routes fresh.
    let (_, json) = chat_turn(&state, &token, "hi").await;
    assert_eq!(json["intent"], "greet");
}

#[tokio::test]
async fn test_chat_card_block_flow() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    let (_, json) = chat_turn(&state, &token, "I want to know about cards").await;
    assert_eq!(json["intent"], "card_info");
    assert_eq!(json["entity"], "card");

    let (_, json) = chat_turn(&state, &token, "credit").await;
    assert_eq!(json["intent"], "ask_card_action");

    let (_, json) = chat_turn(&state, &token, "block it please").await;
    assert!(json["reply"].as_str().unwrap().contains("blocked"));
    assert_eq!(json["action"], "block_card");
}

#[tokio::test]
async fn test_chat_loan_flow_with_synonym() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    let (_, json) = chat_turn(&state, &token, "tell me about loans").await;
    assert_eq!(json["intent"], "loan_info");

    let (_, json) = chat_turn(&state, &token, "educational").await;
    assert!(json["reply"].as_str().unwrap().contains("Education Loan"));
}

#[tokio::test]
async fn test_chat_transfer_preempts_active_dialog() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;

    // Open a card dialog and accumulate a failure.
    chat_turn(&state, &token, "cards").await;
    let (_, json) = chat_turn(&state, &token, "the shiny one").await;
    assert_eq!(json["intent"], "ask_card_type");

    // Transfer always wins and closes the dialog.
    let (_, json) = chat_turn(&state, &token, "transfer 200 to alice").await;
    assert_eq!(json["intent"], "transfer_help");
    assert_eq!(json["entity"], "transfer");
    assert!(json["reply"].as_str().unwrap().contains("alice"));

    // Dialog is gone: a greeting is a greeting, not a card-type miss.
    let (_, json) = chat_turn(&state, &token, "hello").await;
    assert_eq!(json["intent"], "greet");
}

#[tokio::test]
async fn test_chat_transfer_from_idle() {
    let state = make_state();
    let token = login(&state, "user01", "User01@123").await;
    let (status, json) = chat_turn(&state, &token, "send 99.50 to ravi_k").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "transfer_help");
    let reply = json["reply"].as_str().unwrap();
    assert!(reply.contains("₹ 99.50"));
    assert!(reply.contains("ravi_k"));
}

#[tokio::test]
async fn test_chat_dialog_state_is_per_session() {
    let state = make_state();
    let token_a = login(&state, "user01", "User01@123").await;
    let token_b = login(&state, "user01", "User01@123").await;

    // Session A opens a balance dialog.
    chat_turn(&state, &token_a, "what's my balance").await;

    // Session B is unaffected: digits there hit fresh routing, not the
    // account-number slot.
    let (_, json) = chat_turn(&state, &token_b, "hello there 123456").await;
    assert_eq!(json["intent"], "greet");

    // Session A's dialog is still waiting for the slot.
    let (_, json) = chat_turn(&state, &token_a, "123456").await;
    assert_eq!(json["intent"], "balance_check");
}
