//! Shared state handed to every handler through axum's State extractor.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use teller_chat::DialogEngine;
use teller_core::config::TellerConfig;
use teller_nlu::NluEngine;
use teller_storage::Database;

use crate::sessions::SessionStore;
use crate::store::SqliteAccountStore;

/// The concrete dialog engine wired to the real classifier and store.
pub type ChatEngine = DialogEngine<NluEngine, SqliteAccountStore>;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Mutex<TellerConfig>>,
    /// Users, accounts, and transactions.
    pub database: Arc<Database>,
    /// The per-turn dialog engine (stateless; sessions own dialog state).
    pub engine: Arc<ChatEngine>,
    /// Token-keyed login sessions, each carrying its dialog state.
    pub sessions: Arc<SessionStore>,
    /// Set once at construction, read by /health for uptime.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState wiring the engine to the given components.
    pub fn new(config: TellerConfig, database: Database, nlu: NluEngine) -> Self {
        let database = Arc::new(database);
        let engine = DialogEngine::new(nlu, SqliteAccountStore::new(Arc::clone(&database)))
            .with_transactions_limit(config.chat.transactions_limit)
            .with_max_message_length(config.chat.max_message_length);
        let sessions = SessionStore::new(config.auth.session_timeout_minutes);

        Self {
            config: Arc::new(Mutex::new(config)),
            database,
            engine: Arc::new(engine),
            sessions: Arc::new(sessions),
            start_time: Instant::now(),
        }
    }
}
