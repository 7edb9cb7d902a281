//! Common test fixtures

use rust_decimal::Decimal;
use swiftpay::domain::{Account, AccountType, Amount, Card, CardExpiry, Clock};
use swiftpay::ledger::{LedgerEngine, WalletPolicy};

pub const CARD: i64 = 4486770098076615;

pub fn stamp() -> String {
    "06-08-26, 10:30:00".to_string()
}

pub fn engine() -> LedgerEngine {
    LedgerEngine::new(WalletPolicy::default())
}

pub fn account(phone: i64, name: &str, account_type: AccountType) -> Account {
    let opening = if account_type == AccountType::Admin {
        WalletPolicy::default().admin_initial_balance
    } else {
        Decimal::ZERO
    };
    Account::new(
        phone,
        name.to_string(),
        format!("{phone}@example.com"),
        "password-hash".to_string(),
        account_type,
        opening,
        stamp(),
    )
}

/// Personal account with one freshly attached card holding the policy's
/// initial card balance.
pub fn personal_with_card(phone: i64, name: &str) -> Account {
    let mut account = account(phone, name, AccountType::Personal);
    let card = Card::new(
        CARD,
        "axis",
        WalletPolicy::default().card_initial_balance,
        CardExpiry::new(12, 99).unwrap(),
        "cvv-hash".to_string(),
    );
    account.add_card(card, Clock.today(), stamp()).unwrap();
    account
}

pub fn amount(value: &str) -> Amount {
    value.parse().unwrap()
}
