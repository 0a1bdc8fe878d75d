//! Login session storage.
//!
//! Sessions are kept server-side in a token-keyed map. Each session
//! carries the authenticated user and the chatbot's per-session
//! [`DialogState`]; the dialog engine itself is stateless. Sessions
//! expire after a configurable period of inactivity. Overlapping writes
//! from the same session are last-write-wins, which is acceptable for a
//! human-paced conversational interface.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Local;
use serde::Serialize;

use teller_chat::DialogState;
use teller_core::error::TellerError;
use teller_core::types::Role;

use crate::auth::generate_token;

/// The authenticated user attached to a session.
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

/// One login session.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
    pub dialog: DialogState,
    pub created_at: i64,
    pub last_seen_at: i64,
}

/// Token-keyed session map with inactivity expiry.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    timeout_minutes: u32,
}

impl SessionStore {
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout_minutes,
        }
    }

    /// Create a session for a user and return its token.
    pub fn create(&self, user: AuthUser) -> Result<String, TellerError> {
        let token = generate_token();
        let now = Local::now().timestamp();
        let session = Session {
            token: token.clone(),
            user,
            dialog: DialogState::Idle,
            created_at: now,
            last_seen_at: now,
        };
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| TellerError::Auth(format!("Session lock poisoned: {}", e)))?;
        sessions.insert(token.clone(), session);
        Ok(token)
    }

    /// Look up a session by token, refreshing its last-seen time.
    ///
    /// Expired sessions are removed and reported as absent.
    pub fn get(&self, token: &str) -> Option<Session> {
        let mut sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Session lock poisoned: {}", e);
                return None;
            }
        };

        let expired = match sessions.get(token) {
            Some(session) => self.is_expired(session),
            None => return None,
        };
        if expired {
            sessions.remove(token);
            return None;
        }

        let session = sessions.get_mut(token)?;
        session.last_seen_at = Local::now().timestamp();
        Some(session.clone())
    }

    /// Replace the dialog state of a session. Missing sessions (logged
    /// out mid-turn) are ignored.
    pub fn set_dialog(&self, token: &str, dialog: DialogState) -> Result<(), TellerError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| TellerError::Auth(format!("Session lock poisoned: {}", e)))?;
        if let Some(session) = sessions.get_mut(token) {
            session.dialog = dialog;
        }
        Ok(())
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, token: &str) -> bool {
        match self.sessions.lock() {
            Ok(mut sessions) => sessions.remove(token).is_some(),
            Err(e) => {
                tracing::error!("Session lock poisoned: {}", e);
                false
            }
        }
    }

    /// Number of live (possibly expired but not yet reaped) sessions.
    pub fn count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn is_expired(&self, session: &Session) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.timeout_minutes) * 60;
        now - session.last_seen_at > timeout_secs
    }
}
