//! Wallet Handler
//!
//! Orchestrates the four money movements: load the involved aggregates,
//! run the ledger engine, persist every touched aggregate in one database
//! transaction and dispatch notification emails after commit. When the
//! engine appended a Failure record to the initiating account, that
//! account is persisted before the error propagates so the audit trail
//! survives.

use sqlx::PgPool;

use crate::domain::{normalize_name, Account, AccountType, Amount, WalletError};
use crate::error::{AppError, AppResult};
use crate::ledger::{LedgerEngine, WalletPolicy};
use crate::notify::Notifier;
use crate::store::WalletStore;

use super::{BankTransferCommand, DepositCommand, PaymentCommand, SellInvestmentCommand};

/// Handler for ledger operations
pub struct WalletHandler {
    store: WalletStore,
    engine: LedgerEngine,
    notifier: Notifier,
}

impl WalletHandler {
    pub fn new(pool: PgPool, policy: WalletPolicy, notifier: Notifier) -> Self {
        Self {
            store: WalletStore::new(pool),
            engine: LedgerEngine::new(policy),
            notifier,
        }
    }

    /// Card -> wallet.
    pub async fn deposit(&self, phone: i64, command: DepositCommand) -> AppResult<Account> {
        let amount = Amount::new(command.amount).map_err(WalletError::from)?;
        let mut account = self.find(phone).await?;

        let recorded = account.transactions().len();
        match self.engine.deposit(&mut account, command.card_number, &amount) {
            Ok(()) => {
                self.store.replace(&mut account).await?;
                tracing::info!(phone, amount = %amount, "Deposit completed");
                Ok(account)
            }
            Err(err) => {
                self.persist_failure_record(&mut account, recorded).await?;
                Err(err.into())
            }
        }
    }

    /// Wallet -> card.
    pub async fn bank_transfer(
        &self,
        phone: i64,
        command: BankTransferCommand,
    ) -> AppResult<Account> {
        let amount = Amount::new(command.amount).map_err(WalletError::from)?;
        let mut account = self.find(phone).await?;

        let recorded = account.transactions().len();
        match self
            .engine
            .bank_transfer(&mut account, command.card_number, &amount)
        {
            Ok(()) => {
                self.store.replace(&mut account).await?;
                tracing::info!(phone, amount = %amount, "Bank transfer completed");
                Ok(account)
            }
            Err(err) => {
                self.persist_failure_record(&mut account, recorded).await?;
                Err(err.into())
            }
        }
    }

    /// Wallet -> wallet with the Admin account as fee/reward pool. All
    /// three aggregates commit atomically.
    pub async fn payment(&self, phone: i64, command: PaymentCommand) -> AppResult<Account> {
        let amount = Amount::new(command.amount).map_err(WalletError::from)?;
        let mut admin = self
            .store
            .find_admin()
            .await?
            .ok_or(WalletError::AdminNotFound)?;
        let mut source = self.find(phone).await?;
        let mut destination = self.find(command.to_phone_number).await?;

        let recorded = source.transactions().len();
        match self
            .engine
            .payment(&mut source, &mut destination, &mut admin, &amount)
        {
            Ok(outcome) => {
                self.store
                    .replace_all(&mut [&mut source, &mut destination, &mut admin])
                    .await?;
                self.notifier.transfer_dispatched(
                    source.email(),
                    "Payment Transaction",
                    &outcome.debit,
                );
                self.notifier.transfer_received(
                    destination.email(),
                    "Payment Transaction",
                    &outcome.credit,
                );
                tracing::info!(
                    from = phone,
                    to = command.to_phone_number,
                    amount = %amount,
                    "Payment completed"
                );
                Ok(source)
            }
            Err(err) => {
                self.persist_failure_record(&mut source, recorded).await?;
                Err(err.into())
            }
        }
    }

    /// Investment position -> wallet. The fund account is resolved by its
    /// normalized name.
    pub async fn sell_investment(
        &self,
        phone: i64,
        command: SellInvestmentCommand,
    ) -> AppResult<Account> {
        let amount = Amount::new(command.amount).map_err(WalletError::from)?;
        let mut investor = self.find(phone).await?;
        let fund_name = normalize_name(&command.investment_account_name);
        let mut fund = self
            .store
            .find_by_name_and_type(&fund_name, AccountType::Investment)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(command.investment_account_name.clone()))?;

        let recorded = investor.transactions().len();
        match self.engine.sell_investment(&mut investor, &mut fund, &amount) {
            Ok(outcome) => {
                self.store
                    .replace_all(&mut [&mut investor, &mut fund])
                    .await?;
                self.notifier.transfer_dispatched(
                    fund.email(),
                    "Investment Transaction",
                    &outcome.credit,
                );
                self.notifier.transfer_received(
                    investor.email(),
                    "Investment Transaction",
                    &outcome.debit,
                );
                tracing::info!(phone, fund = %fund_name, amount = %amount, "Investment sold");
                Ok(investor)
            }
            Err(err) => {
                self.persist_failure_record(&mut investor, recorded).await?;
                Err(err.into())
            }
        }
    }

    /// Persist the initiating account when the engine left a Failure
    /// record on it; other validation failures abort without any write.
    async fn persist_failure_record(
        &self,
        account: &mut Account,
        previously_recorded: usize,
    ) -> Result<(), AppError> {
        if account.transactions().len() > previously_recorded {
            self.store.replace(account).await?;
        }
        Ok(())
    }

    async fn find(&self, phone: i64) -> AppResult<Account> {
        Ok(self
            .store
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(phone.to_string()))?)
    }
}
