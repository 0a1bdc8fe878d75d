//! Repository implementations for SQLite-backed persistence.
//!
//! Provides UserRepository, AccountRepository, and TransactionRepository
//! that operate on the Database struct using raw SQL.

use std::sync::Arc;

use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};

use teller_core::error::TellerError;
use teller_core::types::Role;

use crate::db::Database;
use crate::password;

/// Direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnKind {
    Debit,
    Credit,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Debit => "debit",
            TxnKind::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debit" => Some(TxnKind::Debit),
            "credit" => Some(TxnKind::Credit),
            _ => None,
        }
    }
}

/// A row from the `users` table.
#[derive(Clone, Debug)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub password_hash: String,
}

/// A row from the `accounts` table.
#[derive(Clone, Debug, Serialize)]
pub struct AccountRow {
    pub id: i64,
    pub user_id: i64,
    pub account_number: String,
    pub balance: f64,
}

/// A row from the `transactions` table.
#[derive(Clone, Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub account_id: i64,
    pub txn_time: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TxnKind,
}

/// Repository for user records and credential checks.
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Find a user by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, TellerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, username, full_name, role, password_hash
                     FROM users WHERE username = ?1",
                )
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![username], |row| {
                    let role_str: String = row.get(3)?;
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        full_name: row.get(2)?,
                        role: Role::parse(&role_str).unwrap_or(Role::User),
                        password_hash: row.get(4)?,
                    })
                })
                .optional()
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            Ok(result)
        })
    }

    /// Check a username/password pair and return the user on success.
    pub fn verify(&self, username: &str, pass: &str) -> Result<Option<UserRow>, TellerError> {
        let Some(user) = self.find_by_username(username)? else {
            return Ok(None);
        };
        if password::verify(pass, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Insert a user and return the generated id.
    pub fn insert(
        &self,
        username: &str,
        full_name: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<i64, TellerError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, full_name, role, password_hash)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![username, full_name, role.as_str(), password_hash],
            )
            .map_err(|e| TellerError::Storage(format!("Failed to insert user: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Count all users.
    pub fn count(&self) -> Result<u64, TellerError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                .map_err(|e| TellerError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Repository for account records.
pub struct AccountRepository {
    db: Arc<Database>,
}

impl AccountRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Sum of balances across all of a user's accounts.
    pub fn balance_total(&self, user_id: i64) -> Result<f64, TellerError> {
        self.db.with_conn(|conn| {
            let total: f64 = conn
                .query_row(
                    "SELECT COALESCE(SUM(balance), 0.0) FROM accounts WHERE user_id = ?1",
                    rusqlite::params![user_id],
                    |row| row.get(0),
                )
                .map_err(|e| TellerError::Storage(e.to_string()))?;
            Ok(total)
        })
    }

    /// All accounts owned by a user.
    pub fn list_for_user(&self, user_id: i64) -> Result<Vec<AccountRow>, TellerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, account_number, balance
                     FROM accounts WHERE user_id = ?1 ORDER BY id",
                )
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![user_id], |row| {
                    Ok(AccountRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        account_number: row.get(2)?,
                        balance: row.get(3)?,
                    })
                })
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            let mut accounts = Vec::new();
            for row in rows {
                accounts.push(row.map_err(|e| TellerError::Storage(e.to_string()))?);
            }
            Ok(accounts)
        })
    }

    /// Insert an account and return the generated id.
    pub fn insert(
        &self,
        user_id: i64,
        account_number: &str,
        balance: f64,
    ) -> Result<i64, TellerError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (user_id, account_number, balance)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, account_number, balance],
            )
            .map_err(|e| TellerError::Storage(format!("Failed to insert account: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }
}

/// Repository for transaction records.
pub struct TransactionRepository {
    db: Arc<Database>,
}

impl TransactionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The most recent transactions across all of a user's accounts,
    /// newest first, at most `limit` rows.
    pub fn last_for_user(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<TransactionRow>, TellerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT t.id, t.account_id, t.txn_time, t.description, t.amount, t.type
                     FROM transactions t
                     JOIN accounts a ON a.id = t.account_id
                     WHERE a.user_id = ?1
                     ORDER BY datetime(t.txn_time) DESC
                     LIMIT ?2",
                )
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], |row| {
                    let kind_str: String = row.get(5)?;
                    Ok(TransactionRow {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        txn_time: row.get(2)?,
                        description: row.get(3)?,
                        amount: row.get(4)?,
                        kind: TxnKind::parse(&kind_str).unwrap_or(TxnKind::Debit),
                    })
                })
                .map_err(|e| TellerError::Storage(e.to_string()))?;

            let mut txns = Vec::new();
            for row in rows {
                txns.push(row.map_err(|e| TellerError::Storage(e.to_string()))?);
            }
            Ok(txns)
        })
    }

    /// Insert a transaction and return the generated id.
    pub fn insert(
        &self,
        account_id: i64,
        txn_time: &str,
        description: &str,
        amount: f64,
        kind: TxnKind,
    ) -> Result<i64, TellerError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO transactions (account_id, txn_time, description, amount, type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![account_id, txn_time, description, amount, kind.as_str()],
            )
            .map_err(|e| TellerError::Storage(format!("Failed to insert transaction: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }
}
