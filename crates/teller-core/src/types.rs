use serde::{Deserialize, Serialize};

/// A user's role within the bank portal.
///
/// Stored in the `users.role` column and checked by the API layer:
/// the chatbot and the account endpoints are customer-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A retail customer with accounts and transactions.
    User,
    /// Branch manager.
    Manager,
    /// Branch employee.
    Employee,
}

impl Role {
    /// The database representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Parse a role from its database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "manager" => Some(Role::Manager),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// Format an amount as rupees with comma grouping and two decimals,
/// e.g. `₹ 12,345.00`. Negative amounts keep the sign ahead of the digits.
pub fn format_rupees(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("₹ -{}.{:02}", grouped, frac)
    } else {
        format!("₹ {}.{:02}", grouped, frac)
    }
}
