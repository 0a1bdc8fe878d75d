//! SQLite-backed implementation of the chat engine's account store seam.
//!
//! Bridges the dialog engine's read-only [`AccountStore`] trait onto the
//! storage repositories so the chat crate stays independent of SQLite.

use std::sync::Arc;

use teller_chat::{AccountStore, TransactionRecord};
use teller_core::error::TellerError;
use teller_storage::{AccountRepository, Database, TransactionRepository};

/// Read-only account/transaction lookups for the dialog engine.
pub struct SqliteAccountStore {
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl SqliteAccountStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            accounts: AccountRepository::new(Arc::clone(&db)),
            transactions: TransactionRepository::new(db),
        }
    }
}

impl AccountStore for SqliteAccountStore {
    fn balance_total(&self, user_id: i64) -> Result<f64, TellerError> {
        self.accounts.balance_total(user_id)
    }

    fn last_transactions(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, TellerError> {
        let rows = self.transactions.last_for_user(user_id, limit)?;
        Ok(rows
            .into_iter()
            .map(|row| TransactionRecord {
                date: row.txn_time,
                description: row.description,
                amount: row.amount,
                kind: row.kind.as_str().to_string(),
            })
            .collect())
    }
}
