//! Teller storage crate - SQLite persistence for the demo bank.
//!
//! Provides a WAL-mode SQLite database with migrations, repositories for
//! users/accounts/transactions, Argon2 password hashing, and demo seed data.

pub mod db;
pub mod migrations;
pub mod password;
pub mod repository;
pub mod seed;

pub use db::Database;
pub use repository::{
    AccountRepository, AccountRow, TransactionRepository, TransactionRow, TxnKind, UserRepository,
    UserRow,
};
pub use seed::seed_demo_data;
