//! Reply text construction.
//!
//! Canned strings and small templates for every outcome the engine can
//! produce. Kept separate from the state machine so the wording can be
//! tuned without touching transition logic.

use teller_core::types::format_rupees;

use crate::types::{CardType, ChatReply, LoanType, TransactionRecord, Transfer};

/// Fixed reply when nothing matches and the classifier has no answer.
pub const FALLBACK_REPLY: &str = "I didn't quite get that, but I'm here to help.";

/// Default greeting when the response catalog has no `greet` entry.
pub const GREETING_REPLY: &str =
    "Hello! Ask me about balance, last transactions, loans, cards or transfers.";

pub fn fallback() -> ChatReply {
    ChatReply::labeled(FALLBACK_REPLY, "fallback", "fallback")
}

pub fn greeting(canned: Option<String>) -> ChatReply {
    ChatReply::labeled(
        canned.unwrap_or_else(|| GREETING_REPLY.to_string()),
        "greet",
        "greet",
    )
}

// ---- Balance flow ----

pub fn start_balance() -> ChatReply {
    ChatReply::labeled(
        "Sure, please provide your account number (digits only).",
        "balance_check",
        "balance_check",
    )
}

pub fn reprompt_account_number() -> ChatReply {
    ChatReply::labeled(
        "Please provide your account number (digits only).",
        "ask_account_number",
        "account_number",
    )
}

pub fn abandon_account_number() -> ChatReply {
    ChatReply::labeled(
        "I couldn't read the account number. Please try later.",
        "fallback",
        "fallback",
    )
}

pub fn balance_result(account_number: &str, total: f64) -> ChatReply {
    ChatReply::labeled(
        format!(
            "Balance for account {} is {}.",
            account_number,
            format_rupees(total)
        ),
        "balance_check",
        "balance_check",
    )
    .with_action("show_balance")
}

// ---- Card flow ----

pub fn start_card() -> ChatReply {
    ChatReply::labeled(
        "Which card would you like to know about: credit, debit or prepaid?",
        "card_info",
        "card",
    )
}

pub fn reprompt_card_type() -> ChatReply {
    ChatReply::labeled(
        "Please tell me the card type: credit, debit or prepaid.",
        "ask_card_type",
        "card_type",
    )
}

pub fn prompt_card_action(card_type: CardType) -> ChatReply {
    ChatReply::labeled(
        format!(
            "What would you like to do with your {} card? I can share details or block it.",
            card_type.as_str()
        ),
        "ask_card_action",
        "card_action",
    )
}

pub fn reprompt_card_action(card_type: CardType) -> ChatReply {
    ChatReply::labeled(
        format!(
            "Would you like details of your {} card, or to block it?",
            card_type.as_str()
        ),
        "ask_card_action",
        "card_action",
    )
}

pub fn abandon_card_type() -> ChatReply {
    ChatReply::labeled(
        "I couldn't detect the card type. Please try later.",
        "fallback",
        "fallback",
    )
}

pub fn abandon_card_action() -> ChatReply {
    ChatReply::labeled(
        "I couldn't work out what to do with your card. Please try later.",
        "fallback",
        "fallback",
    )
}

pub fn card_details(card_type: CardType) -> ChatReply {
    let details = match card_type {
        CardType::Credit => {
            "Credit Card: up to 45 days interest-free credit and reward points on every spend."
        }
        CardType::Debit => {
            "Debit Card: linked to your savings account, free withdrawals at our ATMs."
        }
        CardType::Prepaid => {
            "Prepaid Card: load it in advance and spend anywhere cards are accepted."
        }
    };
    ChatReply::labeled(details, "card_info", "card")
}

pub fn card_blocked(card_type: CardType) -> ChatReply {
    ChatReply::labeled(
        format!(
            "Your {} card has been blocked. A confirmation SMS is on its way.",
            card_type.as_str()
        ),
        "card_block",
        "card",
    )
    .with_action("block_card")
}

// ---- Loan flow ----

pub fn start_loan() -> ChatReply {
    ChatReply::labeled(
        "Which loan are you interested in: personal, home, car or education?",
        "loan_info",
        "loan",
    )
}

pub fn reprompt_loan_type() -> ChatReply {
    ChatReply::labeled(
        "Please pick a loan type: personal, home, car or education.",
        "ask_loan_type",
        "loan_type",
    )
}

pub fn abandon_loan_type() -> ChatReply {
    ChatReply::labeled(
        "I couldn't detect the loan type. Please try later.",
        "fallback",
        "fallback",
    )
}

pub fn loan_details(loan_type: LoanType) -> ChatReply {
    let details = match loan_type {
        LoanType::Personal => "Personal Loan: rates from 11.5% p.a., tenures up to 5 years.",
        LoanType::Home => "Home Loan: rates from 8.4% p.a., tenures up to 30 years.",
        LoanType::Car => "Car Loan: rates from 9.2% p.a., tenures up to 7 years.",
        LoanType::Education => {
            "Education Loan: rates from 9.8% p.a., repayment starts after the course ends."
        }
    };
    ChatReply::labeled(details, "loan_info", "loan")
}

// ---- One-shot intents ----

pub fn transfer_confirmation(transfer: &Transfer) -> ChatReply {
    ChatReply::labeled(
        format!(
            "Transfer initiated: {} to {}. You'll get an OTP to confirm.",
            format_rupees(transfer.amount),
            transfer.recipient
        ),
        "transfer_help",
        "transfer",
    )
}

pub fn last_transactions(transactions: Vec<TransactionRecord>) -> ChatReply {
    ChatReply::labeled(
        "Here are your last transactions.",
        "last_transactions",
        "last_transactions",
    )
    .with_action("show_transactions")
    .with_transactions(transactions)
}

pub fn canned(intent: &str, reply: String) -> ChatReply {
    ChatReply::labeled(reply, intent, intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_result_mentions_account_and_amount() {
        let reply = balance_result("998877", 12345.0);
        assert!(reply.reply.contains("998877"));
        assert!(reply.reply.contains("12,345.00"));
        assert_eq!(reply.intent, "balance_check");
        assert_eq!(reply.action.as_deref(), Some("show_balance"));
    }

    #[test]
    fn test_transfer_confirmation_formats_amount() {
        let reply = transfer_confirmation(&Transfer {
            amount: 200.0,
            recipient: "alice".to_string(),
        });
        assert!(reply.reply.contains("₹ 200.00"));
        assert!(reply.reply.contains("alice"));
        assert_eq!(reply.intent, "transfer_help");
        assert_eq!(reply.entity, "transfer");
    }

    #[test]
    fn test_card_blocked_carries_action() {
        let reply = card_blocked(CardType::Credit);
        assert!(reply.reply.contains("credit"));
        assert_eq!(reply.action.as_deref(), Some("block_card"));
    }

    #[test]
    fn test_loan_details_per_type() {
        assert!(loan_details(LoanType::Personal).reply.contains("Personal"));
        assert!(loan_details(LoanType::Education)
            .reply
            .contains("Education"));
    }

    #[test]
    fn test_abandon_replies_are_fallback_labeled() {
        for reply in [
            abandon_account_number(),
            abandon_card_type(),
            abandon_card_action(),
            abandon_loan_type(),
        ] {
            assert_eq!(reply.intent, "fallback");
            assert_eq!(reply.entity, "fallback");
            assert!(reply.reply.contains("Please try later"));
        }
    }

    #[test]
    fn test_greeting_prefers_canned() {
        let reply = greeting(Some("Namaste!".to_string()));
        assert_eq!(reply.reply, "Namaste!");
        let reply = greeting(None);
        assert_eq!(reply.reply, GREETING_REPLY);
    }

    #[test]
    fn test_last_transactions_payload() {
        let reply = last_transactions(vec![]);
        assert_eq!(reply.action.as_deref(), Some("show_transactions"));
        assert_eq!(reply.transactions.as_deref(), Some(&[][..]));
    }
}
