//! Card Handler
//!
//! Attach, re-default and remove payment cards on an account.

use sqlx::PgPool;

use crate::domain::{validate, Account, Card, Clock, WalletError};
use crate::error::AppResult;
use crate::ledger::WalletPolicy;
use crate::security::SecretHasher;
use crate::store::WalletStore;

use super::AddCardCommand;

/// Handler for card subsystem operations
pub struct CardHandler {
    store: WalletStore,
    hasher: SecretHasher,
    policy: WalletPolicy,
    clock: Clock,
}

impl CardHandler {
    pub fn new(pool: PgPool, policy: WalletPolicy) -> Self {
        Self {
            store: WalletStore::new(pool),
            hasher: SecretHasher,
            policy,
            clock: Clock,
        }
    }

    /// Attach a card; the first card on an account becomes its default.
    pub async fn add_card(&self, phone: i64, command: AddCardCommand) -> AppResult<Account> {
        validate::card_number(command.card_number)?;
        validate::card_name(&command.card_name)?;
        validate::cvv(&command.cvv)?;
        let expiry = validate::expiry(&command.expiry_month, &command.expiry_year)?;

        let mut account = self.find(phone).await?;
        let cvv_hash = self.hasher.hash(&command.cvv)?;
        let card = Card::new(
            command.card_number,
            &command.card_name,
            self.policy.card_initial_balance,
            expiry,
            cvv_hash,
        );
        account.add_card(card, self.clock.today(), self.clock.stamp())?;
        self.store.replace(&mut account).await?;

        tracing::info!(phone, card = command.card_number, "Card added");
        Ok(account)
    }

    pub async fn set_default_card(&self, phone: i64, card_number: i64) -> AppResult<Account> {
        let mut account = self.find(phone).await?;
        account.set_default_card(card_number, self.clock.stamp())?;
        self.store.replace(&mut account).await?;
        Ok(account)
    }

    pub async fn remove_card(&self, phone: i64, card_number: i64) -> AppResult<Account> {
        let mut account = self.find(phone).await?;
        account.remove_card(card_number, self.clock.stamp())?;
        self.store.replace(&mut account).await?;

        tracing::info!(phone, card = card_number, "Card removed");
        Ok(account)
    }

    async fn find(&self, phone: i64) -> AppResult<Account> {
        Ok(self
            .store
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(phone.to_string()))?)
    }
}
