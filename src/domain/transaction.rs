//! Transaction & Audit Records
//!
//! Immutable records appended to an account's history for every attempted
//! money movement (successful or not), plus the audit log entries written
//! on account and card mutations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountType;

/// Which way money moved from the perspective of the record's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDirection {
    Credited,
    Debited,
}

impl TransactionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credited => "Credited",
            Self::Debited => "Debited",
        }
    }
}

/// Category label attached to payment-style movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentCategory {
    Transfer,
    Payment,
    Bill,
    Service,
    Investment,
    Donation,
    InvestmentSale,
}

impl PaymentCategory {
    /// Category a payment takes based on the recipient's account type.
    /// Admin accounts cannot receive payments.
    pub fn for_recipient(account_type: AccountType) -> Option<Self> {
        match account_type {
            AccountType::Personal => Some(Self::Transfer),
            AccountType::Business => Some(Self::Payment),
            AccountType::Utility => Some(Self::Bill),
            AccountType::Service => Some(Self::Service),
            AccountType::Charity => Some(Self::Donation),
            AccountType::Investment => Some(Self::Investment),
            AccountType::Admin => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "Transfer",
            Self::Payment => "Payment",
            Self::Bill => "Bill",
            Self::Service => "Service",
            Self::Investment => "Investment",
            Self::Donation => "Donation",
            Self::InvestmentSale => "Investment Sale",
        }
    }
}

/// Outcome of the attempted movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    Failure(String),
}

/// One immutable ledger record. `direction` is `None` for failed attempts,
/// matching the "-" rendering in the transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    stamp: String,
    from_id: i64,
    from_name: String,
    to_id: i64,
    to_name: String,
    amount: Decimal,
    direction: Option<TransactionDirection>,
    category: Option<PaymentCategory>,
    reward: Option<Decimal>,
    status: TransactionStatus,
}

impl Transaction {
    pub fn success(
        stamp: String,
        from: (i64, &str),
        to: (i64, &str),
        amount: Decimal,
        direction: TransactionDirection,
        category: Option<PaymentCategory>,
        reward: Option<Decimal>,
    ) -> Self {
        Self {
            stamp,
            from_id: from.0,
            from_name: from.1.to_string(),
            to_id: to.0,
            to_name: to.1.to_string(),
            amount,
            direction: Some(direction),
            category,
            reward,
            status: TransactionStatus::Success,
        }
    }

    pub fn failure(
        stamp: String,
        from: (i64, &str),
        to: (i64, &str),
        amount: Decimal,
        reason: String,
    ) -> Self {
        Self {
            stamp,
            from_id: from.0,
            from_name: from.1.to_string(),
            to_id: to.0,
            to_name: to.1.to_string(),
            amount,
            direction: None,
            category: None,
            reward: None,
            status: TransactionStatus::Failure(reason),
        }
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    pub fn from_id(&self) -> i64 {
        self.from_id
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn to_id(&self) -> i64 {
        self.to_id
    }

    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn direction(&self) -> Option<TransactionDirection> {
        self.direction
    }

    pub fn category(&self) -> Option<PaymentCategory> {
        self.category
    }

    pub fn reward(&self) -> Option<Decimal> {
        self.reward
    }

    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, TransactionStatus::Failure(_))
    }

    /// "Credited", "Debited (Payment)" or "-" for failures.
    pub fn type_label(&self) -> String {
        match (self.direction, self.category) {
            (Some(direction), Some(category)) => {
                format!("{} ({})", direction.as_str(), category.as_str())
            }
            (Some(direction), None) => direction.as_str().to_string(),
            (None, _) => "-".to_string(),
        }
    }

    /// Reward amount with two decimals, or "-" when none accrued.
    pub fn reward_label(&self) -> String {
        match self.reward {
            Some(reward) => format!("{reward:.2}"),
            None => "-".to_string(),
        }
    }

    /// "Success" or "Failure (<reason>)".
    pub fn status_label(&self) -> String {
        match &self.status {
            TransactionStatus::Success => "Success".to_string(),
            TransactionStatus::Failure(reason) => format!("Failure ({reason})"),
        }
    }
}

/// Audit trail entry appended to an account on every lifecycle, card and
/// security-relevant event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    stamp: String,
    action: String,
    status: String,
}

impl AuditLog {
    pub fn success(stamp: String, action: String) -> Self {
        Self {
            stamp,
            action,
            status: "Success".to_string(),
        }
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> String {
        "06-08-26, 10:30:00".to_string()
    }

    #[test]
    fn test_success_labels() {
        let tx = Transaction::success(
            stamp(),
            (6381342954, "Anush Raghavender"),
            (7358440894, "Sriman Narayana"),
            Decimal::new(100, 0),
            TransactionDirection::Debited,
            Some(PaymentCategory::Payment),
            None,
        );
        assert_eq!(tx.type_label(), "Debited (Payment)");
        assert_eq!(tx.reward_label(), "-");
        assert_eq!(tx.status_label(), "Success");
        assert!(!tx.is_failure());
    }

    #[test]
    fn test_plain_credit_label() {
        let tx = Transaction::success(
            stamp(),
            (4486770098076615, "Axis Bank"),
            (6381342954, "Anush Raghavender"),
            Decimal::new(500, 0),
            TransactionDirection::Credited,
            None,
            None,
        );
        assert_eq!(tx.type_label(), "Credited");
    }

    #[test]
    fn test_failure_labels() {
        let tx = Transaction::failure(
            stamp(),
            (6381342954, "Anush Raghavender"),
            (7358440894, "Sriman Narayana"),
            Decimal::new(100000, 0),
            "Amount To Transfer Greater Than Wallet Balance".to_string(),
        );
        assert_eq!(tx.type_label(), "-");
        assert_eq!(
            tx.status_label(),
            "Failure (Amount To Transfer Greater Than Wallet Balance)"
        );
        assert!(tx.is_failure());
    }

    #[test]
    fn test_reward_label_two_decimals() {
        let tx = Transaction::success(
            stamp(),
            (1, "A"),
            (2, "B"),
            Decimal::new(500, 0),
            TransactionDirection::Debited,
            Some(PaymentCategory::Transfer),
            Some(Decimal::new(10, 0)),
        );
        assert_eq!(tx.reward_label(), "10.00");
    }

    #[test]
    fn test_recipient_category_by_type() {
        assert_eq!(
            PaymentCategory::for_recipient(AccountType::Business),
            Some(PaymentCategory::Payment)
        );
        assert_eq!(
            PaymentCategory::for_recipient(AccountType::Charity),
            Some(PaymentCategory::Donation)
        );
        assert_eq!(PaymentCategory::for_recipient(AccountType::Admin), None);
    }
}
