//! Account Aggregate
//!
//! An Account owns its cards, transaction history, audit logs and position
//! maps; all mutation goes through the aggregate's own operations and the
//! whole aggregate is persisted as one unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::card::Card;
use super::error::WalletError;
use super::transaction::{AuditLog, PaymentCategory, Transaction};

/// Account classes. The capability methods replace the per-operation
/// "read-only type" lists of string-typed designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Personal,
    Business,
    Utility,
    Service,
    Charity,
    Investment,
    Admin,
}

impl AccountType {
    /// Parse a user-supplied type name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "personal" => Some(Self::Personal),
            "business" => Some(Self::Business),
            "utility" => Some(Self::Utility),
            "service" => Some(Self::Service),
            "charity" => Some(Self::Charity),
            "investment" => Some(Self::Investment),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Whether this class may move money out of its wallet (deposit,
    /// bank transfer, payment, investment sale). Every other class can
    /// only receive funds.
    pub fn can_initiate_wallet_debit(&self) -> bool {
        matches!(self, Self::Personal)
    }

    /// Whether payment cards may be attached to this class.
    pub fn can_hold_cards(&self) -> bool {
        matches!(self, Self::Personal | Self::Service)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Business => "Business",
            Self::Utility => "Utility",
            Self::Service => "Service",
            Self::Charity => "Charity",
            Self::Investment => "Investment",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status. "Deletion" is a flip to Inactive, never a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Account Aggregate, keyed by a 10-digit phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    phone: i64,
    user_name: String,
    email: String,
    password_hash: String,
    account_type: AccountType,
    status: AccountStatus,
    balance: Decimal,
    rewards: Decimal,
    total_transfers: Decimal,
    total_payments: Decimal,
    total_bills: Decimal,
    total_services: Decimal,
    total_investments: Decimal,
    total_donations: Decimal,
    created_at: String,
    activated_at: String,
    deleted_at: String,
    cards: Vec<Card>,
    transactions: Vec<Transaction>,
    logs: Vec<AuditLog>,
    donations: BTreeMap<String, Decimal>,
    investments: BTreeMap<String, Decimal>,
    version: i64,
}

impl Account {
    /// Create a fresh account with empty collections and an opening
    /// balance (non-zero only for the Admin account). Writes the first
    /// audit log entry.
    pub fn new(
        phone: i64,
        user_name: String,
        email: String,
        password_hash: String,
        account_type: AccountType,
        opening_balance: Decimal,
        stamp: String,
    ) -> Self {
        let mut account = Self {
            phone,
            user_name,
            email,
            password_hash,
            account_type,
            status: AccountStatus::Active,
            balance: opening_balance,
            rewards: Decimal::ZERO,
            total_transfers: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            total_bills: Decimal::ZERO,
            total_services: Decimal::ZERO,
            total_investments: Decimal::ZERO,
            total_donations: Decimal::ZERO,
            created_at: stamp.clone(),
            activated_at: String::new(),
            deleted_at: String::new(),
            cards: Vec::new(),
            transactions: Vec::new(),
            logs: Vec::new(),
            donations: BTreeMap::new(),
            investments: BTreeMap::new(),
            version: 1,
        };
        account.log(stamp, "Account Creation");
        account
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn phone(&self) -> i64 {
        self.phone
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn rewards(&self) -> Decimal {
        self.rewards
    }

    pub fn total_transfers(&self) -> Decimal {
        self.total_transfers
    }

    pub fn total_payments(&self) -> Decimal {
        self.total_payments
    }

    pub fn total_bills(&self) -> Decimal {
        self.total_bills
    }

    pub fn total_services(&self) -> Decimal {
        self.total_services
    }

    pub fn total_investments(&self) -> Decimal {
        self.total_investments
    }

    pub fn total_donations(&self) -> Decimal {
        self.total_donations
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn activated_at(&self) -> &str {
        &self.activated_at
    }

    pub fn deleted_at(&self) -> &str {
        &self.deleted_at
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn logs(&self) -> &[AuditLog] {
        &self.logs
    }

    pub fn donations(&self) -> &BTreeMap<String, Decimal> {
        &self.donations
    }

    pub fn investments(&self) -> &BTreeMap<String, Decimal> {
        &self.investments
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    // =========================================================================
    // Status transitions
    // =========================================================================

    /// Soft-delete: flip to Inactive, stamp the deletion time, clear the
    /// activation time. The record itself is never removed.
    pub fn deactivate(&mut self, stamp: String) {
        self.status = AccountStatus::Inactive;
        self.deleted_at = stamp.clone();
        self.activated_at = String::new();
        self.log(stamp, "Account Deletion");
    }

    /// Reactivation on successful sign-in of an Inactive account.
    pub fn reactivate(&mut self, stamp: String) {
        self.status = AccountStatus::Active;
        self.deleted_at = String::new();
        self.activated_at = stamp.clone();
        self.log(stamp, "Account Activation");
    }

    // =========================================================================
    // Profile updates (values validated and normalized by the caller)
    // =========================================================================

    pub fn rename(&mut self, user_name: String, stamp: String) {
        self.user_name = user_name;
        self.log(stamp, "User Name Updation");
    }

    pub fn change_email(&mut self, email: String, stamp: String) {
        let action = format!("Email Address Updated To {email}");
        self.email = email;
        self.log(stamp, action);
    }

    pub fn change_password(&mut self, password_hash: String, stamp: String) {
        self.password_hash = password_hash;
        self.log(stamp, "Password Updation");
    }

    /// Re-keys the aggregate; the store must delete the old key and insert
    /// the new one inside a single transaction.
    pub fn change_phone(&mut self, phone: i64, stamp: String) {
        self.phone = phone;
        self.log(stamp, format!("Phone Number Updated To {phone}"));
    }

    // =========================================================================
    // Card subsystem
    // =========================================================================

    pub fn find_card(&self, number: i64) -> Option<&Card> {
        self.cards.iter().find(|card| card.number() == number)
    }

    /// Attach a card. The first card ever added becomes the default.
    pub fn add_card(
        &mut self,
        card: Card,
        today: NaiveDate,
        stamp: String,
    ) -> Result<(), WalletError> {
        if !self.account_type.can_hold_cards() {
            return Err(WalletError::ReadOnlyAccount(self.phone));
        }
        if self.cards.iter().any(|c| c.number() == card.number()) {
            return Err(WalletError::CardExists(card.number()));
        }
        if card.expiry().is_past(today) {
            return Err(WalletError::CardExpired(card.expiry().to_string()));
        }

        let mut card = card;
        if self.cards.is_empty() {
            card.set_default(true);
        }
        self.cards.push(card);
        self.log(stamp, "Card Addition");
        Ok(())
    }

    /// Make the matched card the default and clear the flag on every other
    /// card in the set.
    pub fn set_default_card(&mut self, number: i64, stamp: String) -> Result<(), WalletError> {
        if self.cards.is_empty() {
            return Err(WalletError::NoCardsFound);
        }
        if !self.cards.iter().any(|card| card.number() == number) {
            return Err(WalletError::CardNotFound(number));
        }

        for card in &mut self.cards {
            card.set_default(card.number() == number);
        }
        self.log(stamp, "Default Card Updation");
        Ok(())
    }

    /// Remove a non-default card from the set.
    pub fn remove_card(&mut self, number: i64, stamp: String) -> Result<(), WalletError> {
        if self.cards.is_empty() {
            return Err(WalletError::NoCardsFound);
        }
        let card = self
            .cards
            .iter()
            .find(|card| card.number() == number)
            .ok_or(WalletError::CardNotFound(number))?;
        if card.is_default() {
            return Err(WalletError::DefaultCardUndeletable(number));
        }

        self.cards.retain(|card| card.number() != number);
        self.log(stamp, "Card Deletion");
        Ok(())
    }

    // =========================================================================
    // Money primitives (validation lives in the ledger engine)
    // =========================================================================

    pub(crate) fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }

    pub(crate) fn add_reward(&mut self, amount: Decimal) {
        self.rewards += amount;
    }

    /// Move money from a card into the wallet, both sides in one step.
    pub(crate) fn move_card_to_wallet(&mut self, number: i64, amount: Decimal) {
        if let Some(card) = self.cards.iter_mut().find(|card| card.number() == number) {
            card.debit(amount);
            self.balance += amount;
        }
    }

    /// Move money from the wallet back onto a card.
    pub(crate) fn move_wallet_to_card(&mut self, number: i64, amount: Decimal) {
        if let Some(card) = self.cards.iter_mut().find(|card| card.number() == number) {
            card.credit(amount);
            self.balance -= amount;
        }
    }

    /// Accumulate a category total. An investment sale reduces the
    /// cumulative investment total instead of growing one.
    pub(crate) fn accumulate(&mut self, category: PaymentCategory, amount: Decimal) {
        match category {
            PaymentCategory::Transfer => self.total_transfers += amount,
            PaymentCategory::Payment => self.total_payments += amount,
            PaymentCategory::Bill => self.total_bills += amount,
            PaymentCategory::Service => self.total_services += amount,
            PaymentCategory::Investment => self.total_investments += amount,
            PaymentCategory::Donation => self.total_donations += amount,
            PaymentCategory::InvestmentSale => self.total_investments -= amount,
        }
    }

    pub fn donation_position(&self, name: &str) -> Decimal {
        self.donations.get(name).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn investment_position(&self, name: &str) -> Decimal {
        self.investments.get(name).copied().unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn add_donation_position(&mut self, name: &str, amount: Decimal) {
        *self.donations.entry(name.to_string()).or_insert(Decimal::ZERO) += amount;
    }

    pub(crate) fn add_investment_position(&mut self, name: &str, amount: Decimal) {
        *self.investments.entry(name.to_string()).or_insert(Decimal::ZERO) += amount;
    }

    pub(crate) fn reduce_investment_position(&mut self, name: &str, amount: Decimal) {
        *self.investments.entry(name.to_string()).or_insert(Decimal::ZERO) -= amount;
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn log(&mut self, stamp: String, action: impl Into<String>) {
        self.logs.push(AuditLog::success(stamp, action.into()));
    }
}
