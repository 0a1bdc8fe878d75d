//! Teller API crate - axum HTTP server for the demo bank.
//!
//! Provides the REST API: session login/logout, the chatbot endpoint,
//! balance and transaction lookups, and health checks.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod store;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use sessions::{AuthUser, Session, SessionStore};
pub use state::AppState;
pub use store::SqliteAccountStore;
