//! Free-text slot extraction and keyword routing rules.
//!
//! Every extractor is a total function: it returns `None` on a miss and
//! never panics on any input. Keyword rules are checked before the
//! statistical classifier because hand-written patterns are more precise
//! for the banking domain's core intents.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CardAction, CardType, LoanType, Transfer};

// =============================================================================
// Compiled regex sets (compiled once, reused across calls)
// =============================================================================

/// A candidate account number is a run of at least four digits.
static ACCOUNT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4,})").unwrap());

static CARD_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(credit|debit|prepaid)\b").unwrap());

static CARD_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(block|disable|freeze)\b").unwrap());

static CARD_DETAILS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(details?|info|information|show|features?)\b").unwrap());

static LOAN_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(personal|home|car|education(?:al)?)\b").unwrap());

/// "transfer 500 to bob", "send 99.50 rs for alice" -- amount and
/// recipient captured in one shot, so transfers are never slot-filled.
static TRANSFER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:transfer|send)\s+(\d+(?:\.\d{1,2})?)\s*(?:₹|rs\.?|rupees)?\s*(?:to|for)\s+([A-Za-z0-9_]+)\b",
    )
    .unwrap()
});

struct KeywordPatterns {
    greeting: Regex,
    card: Regex,
    loan: Regex,
    balance: Regex,
    transactions: Regex,
}

static KEYWORDS: LazyLock<KeywordPatterns> = LazyLock::new(|| KeywordPatterns {
    greeting: Regex::new(r"(?i)\b(hi|hello|hey)\b").unwrap(),
    card: Regex::new(r"(?i)\b(cards?|credit|debit)\b").unwrap(),
    loan: Regex::new(r"(?i)\b(loans?|emi|interest)\b").unwrap(),
    balance: Regex::new(r"(?i)(\bbalance\b|\bhow\s+much\b)").unwrap(),
    transactions: Regex::new(r"(?i)(\b(?:last|recent)\s+transactions?\b|\bstatement\b)").unwrap(),
});

// =============================================================================
// Slot extractors
// =============================================================================

/// Extract a candidate account number (first run of >= 4 digits).
pub fn extract_account_number(text: &str) -> Option<String> {
    ACCOUNT_NUMBER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a card type token.
pub fn extract_card_type(text: &str) -> Option<CardType> {
    let m = CARD_TYPE_RE.captures(text)?.get(1)?;
    match m.as_str().to_lowercase().as_str() {
        "credit" => Some(CardType::Credit),
        "debit" => Some(CardType::Debit),
        "prepaid" => Some(CardType::Prepaid),
        _ => None,
    }
}

/// Extract what to do with a card. Block requests win over details so
/// "block it and show me the details" blocks the card.
pub fn extract_card_action(text: &str) -> Option<CardAction> {
    if CARD_BLOCK_RE.is_match(text) {
        return Some(CardAction::Block);
    }
    if CARD_DETAILS_RE.is_match(text) {
        return Some(CardAction::Details);
    }
    None
}

/// Extract a loan type token. `educational` normalizes to education.
pub fn extract_loan_type(text: &str) -> Option<LoanType> {
    let m = LOAN_TYPE_RE.captures(text)?.get(1)?;
    match m.as_str().to_lowercase().as_str() {
        "personal" => Some(LoanType::Personal),
        "home" => Some(LoanType::Home),
        "car" => Some(LoanType::Car),
        "education" | "educational" => Some(LoanType::Education),
        _ => None,
    }
}

/// Extract a one-shot transfer command (amount + recipient).
pub fn extract_transfer(text: &str) -> Option<Transfer> {
    let caps = TRANSFER_RE.captures(text)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let recipient = caps.get(2)?.as_str().to_string();
    Some(Transfer { amount, recipient })
}

// =============================================================================
// Keyword routing rules
// =============================================================================

pub fn is_greeting(text: &str) -> bool {
    KEYWORDS.greeting.is_match(text)
}

pub fn is_card_query(text: &str) -> bool {
    KEYWORDS.card.is_match(text)
}

pub fn is_loan_query(text: &str) -> bool {
    KEYWORDS.loan.is_match(text)
}

pub fn is_balance_query(text: &str) -> bool {
    KEYWORDS.balance.is_match(text)
}

pub fn is_transactions_query(text: &str) -> bool {
    KEYWORDS.transactions.is_match(text)
}

// =============================================================================
// Tests
// =============================================================================
