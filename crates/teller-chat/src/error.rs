//! Error types for the dialog engine.
//!
//! Extraction misses and dialog abandonment are normal outcomes handled
//! inside the engine; these errors cover only broken input contracts and
//! failed collaborators, which callers must surface as service failures
//! rather than fallback replies.

/// Errors from the dialog engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
    #[error("account store unavailable: {0}")]
    StoreUnavailable(String),
}
