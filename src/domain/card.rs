//! Card
//!
//! Payment cards owned by an account. A card is keyed by its 16-digit
//! number; the set on an account carries at most one default card.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::WalletError;
use super::normalize_name;

/// Card expiry, month/2-digit-year, compared at month granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardExpiry {
    month: u32,
    year: u32,
}

impl CardExpiry {
    pub fn new(month: u32, year: u32) -> Result<Self, WalletError> {
        if !(1..=12).contains(&month) {
            return Err(WalletError::InvalidInput(
                "Expiry Month Should Be Between 01-12.".to_string(),
            ));
        }
        if year > 99 {
            return Err(WalletError::InvalidInput(
                "Expiry Year Should Have 2 Digits & Only Numbers Are Allowed.".to_string(),
            ));
        }
        Ok(Self { month, year })
    }

    /// Whether the expiry month lies strictly before the given date's month.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        let year = 2000 + self.year as i32;
        (year, self.month) < (today.year(), today.month())
    }
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year)
    }
}

impl TryFrom<String> for CardExpiry {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let invalid =
            || WalletError::InvalidInput(format!("Invalid Card Expiry \"{value}\""));
        let (month, year) = value.split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: u32 = year.parse().map_err(|_| invalid())?;
        Self::new(month, year)
    }
}

impl From<CardExpiry> for String {
    fn from(expiry: CardExpiry) -> Self {
        expiry.to_string()
    }
}

/// Normalize a card display name and append a " Bank" suffix when the word
/// "bank" is absent.
pub fn normalize_card_name(raw: &str) -> String {
    let name = normalize_name(raw);
    if name.to_lowercase().contains("bank") {
        name
    } else {
        format!("{name} Bank")
    }
}

/// Payment card owned exclusively by one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    number: i64,
    name: String,
    balance: Decimal,
    expiry: CardExpiry,
    cvv_hash: String,
    default_card: bool,
}

impl Card {
    /// Build a card from validated inputs; the name is normalized here and
    /// the default flag is decided by the owning account on insertion.
    pub fn new(
        number: i64,
        name: &str,
        balance: Decimal,
        expiry: CardExpiry,
        cvv_hash: String,
    ) -> Self {
        Self {
            number,
            name: normalize_card_name(name),
            balance,
            expiry,
            cvv_hash,
            default_card: false,
        }
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn expiry(&self) -> &CardExpiry {
        &self.expiry
    }

    pub fn is_default(&self) -> bool {
        self.default_card
    }

    pub(crate) fn set_default(&mut self, default: bool) {
        self.default_card = default;
    }

    pub(crate) fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }
}
