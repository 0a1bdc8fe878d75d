//! Demo data seeding.
//!
//! Populates the database with a known set of demo logins, one account per
//! customer, and a short transaction history. Runs only when the users
//! table is empty, so repeated startups leave existing data untouched.

use std::sync::Arc;

use chrono::{Duration, Local};
use rand::Rng;
use tracing::info;

use teller_core::error::TellerError;
use teller_core::types::Role;

use crate::db::Database;
use crate::password;
use crate::repository::{AccountRepository, TransactionRepository, TxnKind, UserRepository};

/// Number of demo customers (`user01` .. `user08`).
const DEMO_CUSTOMERS: u32 = 8;

/// Transactions seeded per account.
const TXNS_PER_ACCOUNT: u32 = 10;

const DESCRIPTIONS: &[&str] = &[
    "UPI Payment",
    "ATM Withdrawal",
    "POS Purchase",
    "Salary Credit",
    "Bill Payment",
    "NEFT Transfer",
];

/// Seed demo users, accounts, and transactions if the database is empty.
///
/// Demo credentials: `manager01` / `Manager@123`, `employee01` /
/// `Employee@123`, and `userNN` / `UserNN@123` for NN in 01..08.
///
/// Returns `true` if data was seeded, `false` if the database already
/// had users.
pub fn seed_demo_data(db: &Arc<Database>) -> Result<bool, TellerError> {
    let users = UserRepository::new(Arc::clone(db));
    if users.count()? > 0 {
        return Ok(false);
    }

    let accounts = AccountRepository::new(Arc::clone(db));
    let txns = TransactionRepository::new(Arc::clone(db));
    let mut rng = rand::rng();

    users.insert(
        "manager01",
        "Priya Manager",
        Role::Manager,
        &password::hash("Manager@123")?,
    )?;
    users.insert(
        "employee01",
        "Ravi Employee",
        Role::Employee,
        &password::hash("Employee@123")?,
    )?;

    for i in 1..=DEMO_CUSTOMERS {
        let username = format!("user{:02}", i);
        let full_name = format!("User {:02}", i);
        let pass = format!("User{:02}@123", i);
        let user_id = users.insert(&username, &full_name, Role::User, &password::hash(&pass)?)?;

        // Account number derived from the user id plus the username tail,
        // balance spread deterministically across customers.
        let tail = &username[username.len() - 2..];
        let account_number = format!("SB{:04}{}", user_id, tail);
        let balance = 10000.0 + ((user_id * 137) % 5000) as f64;
        let account_id = accounts.insert(user_id, &account_number, balance)?;

        let now = Local::now().naive_local();
        for j in 0..TXNS_PER_ACCOUNT {
            let t = now - Duration::days(i64::from(j)) - Duration::hours(rng.random_range(0..24));
            let amount = (rng.random_range(100.0..2000.0_f64) * 100.0).round() / 100.0;
            let kind = if rng.random_bool(0.5) {
                TxnKind::Debit
            } else {
                TxnKind::Credit
            };
            let description = DESCRIPTIONS[rng.random_range(0..DESCRIPTIONS.len())];
            txns.insert(
                account_id,
                &t.format("%Y-%m-%dT%H:%M:%S").to_string(),
                description,
                amount,
                kind,
            )?;
        }
    }

    info!(
        customers = DEMO_CUSTOMERS,
        "Seeded demo users, accounts, and transactions"
    );
    Ok(true)
}
