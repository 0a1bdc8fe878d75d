//! Conversational interface for the Teller demo bank.
//!
//! Provides the slot-filling dialog session engine, the pure free-text
//! extractors it routes on, and the collaborator seams (intent classifier
//! and read-only account store) it depends on.

pub mod engine;
pub mod error;
pub mod extract;
pub mod replies;
pub mod types;

pub use engine::{DialogEngine, DEFAULT_MAX_MESSAGE_LENGTH, MAX_FAILED_ATTEMPTS};
pub use error::ChatError;
pub use types::{
    AccountStore, CardAction, CardType, ChatReply, DialogState, IntentClassifier, LoanType,
    TransactionRecord, Transfer,
};
