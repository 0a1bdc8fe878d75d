//! The dialog session engine.
//!
//! One call per turn: takes the session's current [`DialogState`] and the
//! user's message, returns exactly one reply and the next state. Rules are
//! priority-ordered, first match wins:
//!
//! 1. Transfer preemption (always wins, closes any open dialog).
//! 2. Active-dialog continuation (slot extraction with bounded retries).
//! 3. Fresh keyword routing (greeting, card, loan, balance, transactions).
//! 4. Classifier fallback.
//!
//! Extraction misses and abandonment are normal outcomes; only broken
//! collaborators surface as errors.

use tracing::debug;

use crate::error::ChatError;
use crate::extract;
use crate::replies;
use crate::types::{
    AccountStore, CardAction, CardType, ChatReply, DialogState, IntentClassifier,
};

/// A dialog is abandoned after this many consecutive extraction misses.
/// Identical across all dialog intents.
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Default maximum chat message length in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 2000;

/// Classifier label that routes to the transaction store.
const LABEL_LAST_TRANSACTIONS: &str = "last_transactions";

/// The per-turn dialog engine.
///
/// Holds its collaborators and no per-session state: the session's
/// [`DialogState`] is passed in and handed back on every call, so the
/// caller owns persistence.
pub struct DialogEngine<C, S> {
    classifier: C,
    store: S,
    transactions_limit: u32,
    max_message_length: usize,
}

impl<C: IntentClassifier, S: AccountStore> DialogEngine<C, S> {
    pub fn new(classifier: C, store: S) -> Self {
        Self {
            classifier,
            store,
            transactions_limit: 5,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    /// Override how many transactions "last transactions" returns.
    pub fn with_transactions_limit(mut self, limit: u32) -> Self {
        self.transactions_limit = limit;
        self
    }

    /// Override the maximum accepted message length.
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Process one turn.
    ///
    /// `message` must be non-empty after trimming (the caller answers empty
    /// input with a fixed prompt without invoking the engine; this is a
    /// contract check, not a user-facing path).
    pub fn process(
        &self,
        state: DialogState,
        message: &str,
        user_id: i64,
    ) -> Result<(ChatReply, DialogState), ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.len() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        // Transfers are captured in one shot and always handled eagerly,
        // even while a dialog is collecting slots.
        if let Some(transfer) = extract::extract_transfer(message) {
            if !state.is_idle() {
                debug!("Transfer preempted an active dialog");
            }
            return Ok((replies::transfer_confirmation(&transfer), DialogState::Idle));
        }

        match state {
            DialogState::BalanceCheck { failed_attempts } => {
                self.continue_balance(failed_attempts, message, user_id)
            }
            DialogState::CardFlow {
                card_type,
                failed_attempts,
            } => Ok(self.continue_card(card_type, failed_attempts, message)),
            DialogState::LoanFlow { failed_attempts } => {
                Ok(self.continue_loan(failed_attempts, message))
            }
            DialogState::Idle => self.route_fresh(message, user_id),
        }
    }

    // -----------------------------------------------------------------
    // Dialog continuation
    // -----------------------------------------------------------------

    fn continue_balance(
        &self,
        failed_attempts: u8,
        message: &str,
        user_id: i64,
    ) -> Result<(ChatReply, DialogState), ChatError> {
        if let Some(account) = extract::extract_account_number(message) {
            let total = self
                .store
                .balance_total(user_id)
                .map_err(|e| ChatError::StoreUnavailable(e.to_string()))?;
            debug!(account = %account, "Balance dialog completed");
            return Ok((replies::balance_result(&account, total), DialogState::Idle));
        }

        let failed_attempts = failed_attempts + 1;
        if failed_attempts >= MAX_FAILED_ATTEMPTS {
            debug!("Balance dialog abandoned");
            Ok((replies::abandon_account_number(), DialogState::Idle))
        } else {
            Ok((
                replies::reprompt_account_number(),
                DialogState::BalanceCheck { failed_attempts },
            ))
        }
    }

    fn continue_card(
        &self,
        card_type: Option<CardType>,
        failed_attempts: u8,
        message: &str,
    ) -> (ChatReply, DialogState) {
        match card_type {
            None => {
                if let Some(ct) = extract::extract_card_type(message) {
                    // Counter carries across the slot boundary: it resets
                    // only at dialog start and end.
                    return (
                        replies::prompt_card_action(ct),
                        DialogState::CardFlow {
                            card_type: Some(ct),
                            failed_attempts,
                        },
                    );
                }
                let failed_attempts = failed_attempts + 1;
                if failed_attempts >= MAX_FAILED_ATTEMPTS {
                    debug!("Card dialog abandoned while collecting card type");
                    (replies::abandon_card_type(), DialogState::Idle)
                } else {
                    (
                        replies::reprompt_card_type(),
                        DialogState::CardFlow {
                            card_type: None,
                            failed_attempts,
                        },
                    )
                }
            }
            Some(ct) => match extract::extract_card_action(message) {
                Some(CardAction::Block) => {
                    debug!(card_type = ct.as_str(), "Card dialog completed with block");
                    (replies::card_blocked(ct), DialogState::Idle)
                }
                Some(CardAction::Details) => {
                    debug!(card_type = ct.as_str(), "Card dialog completed with details");
                    (replies::card_details(ct), DialogState::Idle)
                }
                None => {
                    let failed_attempts = failed_attempts + 1;
                    if failed_attempts >= MAX_FAILED_ATTEMPTS {
                        debug!("Card dialog abandoned while collecting action");
                        (replies::abandon_card_action(), DialogState::Idle)
                    } else {
                        (
                            replies::reprompt_card_action(ct),
                            DialogState::CardFlow {
                                card_type: Some(ct),
                                failed_attempts,
                            },
                        )
                    }
                }
            },
        }
    }

    fn continue_loan(&self, failed_attempts: u8, message: &str) -> (ChatReply, DialogState) {
        if let Some(lt) = extract::extract_loan_type(message) {
            debug!(loan_type = lt.as_str(), "Loan dialog completed");
            return (replies::loan_details(lt), DialogState::Idle);
        }

        let failed_attempts = failed_attempts + 1;
        if failed_attempts >= MAX_FAILED_ATTEMPTS {
            debug!("Loan dialog abandoned");
            (replies::abandon_loan_type(), DialogState::Idle)
        } else {
            (
                replies::reprompt_loan_type(),
                DialogState::LoanFlow { failed_attempts },
            )
        }
    }

    // -----------------------------------------------------------------
    // Fresh intent routing
    // -----------------------------------------------------------------

    fn route_fresh(
        &self,
        message: &str,
        user_id: i64,
    ) -> Result<(ChatReply, DialogState), ChatError> {
        if extract::is_greeting(message) {
            let canned = self.classifier.canned_reply("greet");
            return Ok((replies::greeting(canned), DialogState::Idle));
        }

        // Card and loan keywords start a dialog rather than answering
        // immediately: both need a sub-type slot before a useful reply.
        if extract::is_card_query(message) {
            debug!("Card dialog started");
            return Ok((
                replies::start_card(),
                DialogState::CardFlow {
                    card_type: None,
                    failed_attempts: 0,
                },
            ));
        }

        if extract::is_loan_query(message) {
            debug!("Loan dialog started");
            return Ok((
                replies::start_loan(),
                DialogState::LoanFlow { failed_attempts: 0 },
            ));
        }

        if extract::is_balance_query(message) {
            debug!("Balance dialog started");
            return Ok((
                replies::start_balance(),
                DialogState::BalanceCheck { failed_attempts: 0 },
            ));
        }

        // Needs no slots, so it is answered on the spot.
        if extract::is_transactions_query(message) {
            return Ok((self.answer_transactions(user_id)?, DialogState::Idle));
        }

        self.classifier_fallback(message, user_id)
    }

    fn classifier_fallback(
        &self,
        message: &str,
        user_id: i64,
    ) -> Result<(ChatReply, DialogState), ChatError> {
        let label = self
            .classifier
            .classify(message)
            .map_err(|e| ChatError::ClassifierUnavailable(e.to_string()))?;

        if label == LABEL_LAST_TRANSACTIONS {
            return Ok((self.answer_transactions(user_id)?, DialogState::Idle));
        }

        if let Some(reply) = self.classifier.canned_reply(&label) {
            return Ok((replies::canned(&label, reply), DialogState::Idle));
        }

        Ok((replies::fallback(), DialogState::Idle))
    }

    fn answer_transactions(&self, user_id: i64) -> Result<ChatReply, ChatError> {
        let transactions = self
            .store
            .last_transactions(user_id, self.transactions_limit)
            .map_err(|e| ChatError::StoreUnavailable(e.to_string()))?;
        Ok(replies::last_transactions(transactions))
    }
}

// =============================================================================
// Tests
// =============================================================================
