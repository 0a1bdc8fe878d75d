//! Core types for the dialog session engine.
//!
//! The dialog state is a tagged enum: each in-progress flow carries only
//! the slots it needs, and a session is either idle or mid-dialog. The
//! state is serde-serializable so callers can keep it in whatever session
//! store they already use.

use serde::{Deserialize, Serialize};

use teller_core::error::TellerError;

// =============================================================================
// Slot value types
// =============================================================================

/// Card product type collected by the card flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Credit,
    Debit,
    Prepaid,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Credit => "credit",
            CardType::Debit => "debit",
            CardType::Prepaid => "prepaid",
        }
    }
}

/// What the user wants done with a card once the type is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    /// Show product details.
    Details,
    /// Block the card (confirmation only; no account mutation here).
    Block,
}

/// Loan product type collected by the loan flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Personal,
    Home,
    Car,
    Education,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Home => "home",
            LoanType::Car => "car",
            LoanType::Education => "education",
        }
    }
}

/// A one-shot transfer command parsed from free text.
#[derive(Clone, Debug, PartialEq)]
pub struct Transfer {
    pub amount: f64,
    pub recipient: String,
}

// =============================================================================
// Dialog state
// =============================================================================

/// Per-session dialog state, one value per login session.
///
/// A session is either `Idle` or mid-dialog. Each flow variant carries its
/// failure counter and any slot already collected; completing a flow or
/// exceeding the retry threshold returns the session to `Idle`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    /// Waiting for an account number.
    BalanceCheck { failed_attempts: u8 },
    /// Waiting for a card type, then for what to do with the card.
    CardFlow {
        card_type: Option<CardType>,
        failed_attempts: u8,
    },
    /// Waiting for a loan type.
    LoanFlow { failed_attempts: u8 },
}

impl DialogState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DialogState::Idle)
    }

    /// The failure counter of the active dialog, 0 when idle.
    pub fn failed_attempts(&self) -> u8 {
        match self {
            DialogState::Idle => 0,
            DialogState::BalanceCheck { failed_attempts }
            | DialogState::CardFlow {
                failed_attempts, ..
            }
            | DialogState::LoanFlow { failed_attempts } => *failed_attempts,
        }
    }
}

// =============================================================================
// Reply payload
// =============================================================================

/// A transaction as presented in chat replies, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The structured payload produced for every turn.
///
/// `entity` mirrors the resolved intent label (it is not a separately
/// extracted value); `action` and `transactions` are present only when
/// the turn produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub intent: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionRecord>>,
}

impl ChatReply {
    /// A plain reply with matching intent and entity labels.
    pub fn labeled(reply: impl Into<String>, intent: &str, entity: &str) -> Self {
        Self {
            reply: reply.into(),
            intent: intent.to_string(),
            entity: entity.to_string(),
            action: None,
            transactions: None,
        }
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_transactions(mut self, transactions: Vec<TransactionRecord>) -> Self {
        self.transactions = Some(transactions);
        self
    }
}

// =============================================================================
// Collaborator seams
// =============================================================================

/// The offline-trained intent classifier plus its canned-response table.
///
/// `classify` is expected to be total from the engine's point of view: a
/// model that cannot score a message returns the `"fallback"` label. An
/// `Err` means the collaborator itself is broken and is surfaced to the
/// caller as a service failure, never folded into a fallback reply.
pub trait IntentClassifier {
    fn classify(&self, text: &str) -> Result<String, TellerError>;

    /// A canned reply for an intent label, if the catalog has one.
    fn canned_reply(&self, intent: &str) -> Option<String>;
}

/// Read-only view of accounts and transactions, keyed by user id.
pub trait AccountStore {
    fn balance_total(&self, user_id: i64) -> Result<f64, TellerError>;

    /// Most recent transactions, newest first, at most `limit` entries.
    fn last_transactions(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, TellerError>;
}
