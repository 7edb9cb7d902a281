//! Domain Model
//!
//! Aggregates, value types and business errors for the wallet ledger.
//! Everything in this module is persistence-free: state transitions happen
//! on in-memory aggregates and are written back as a whole by the store.

pub mod account;
pub mod card;
pub mod error;
pub mod money;
pub mod time;
pub mod transaction;
pub mod validate;

pub use account::{Account, AccountStatus, AccountType};
pub use card::{Card, CardExpiry};
pub use error::{ErrorKind, ProfileField, WalletError};
pub use money::{Amount, AmountError};
pub use time::Clock;
pub use transaction::{
    AuditLog, PaymentCategory, Transaction, TransactionDirection, TransactionStatus,
};

/// Normalize a display name: lower-case the input, Title Case each word,
/// collapse runs of whitespace into single spaces.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_title_cases_words() {
        assert_eq!(normalize_name("anush raghavender"), "Anush Raghavender");
        assert_eq!(normalize_name("SRIMAN NARAYANA"), "Sriman Narayana");
    }

    #[test]
    fn test_normalize_name_collapses_whitespace() {
        assert_eq!(normalize_name("  swift   pay  "), "Swift Pay");
    }

    #[test]
    fn test_normalize_name_single_word() {
        assert_eq!(normalize_name("axis"), "Axis");
    }
}
