//! User Lifecycle Handler
//!
//! Account creation, authentication, profile updates, soft deletion and
//! the account listings.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    normalize_name, validate, Account, AccountType, Clock, ProfileField, WalletError,
};
use crate::error::AppResult;
use crate::ledger::WalletPolicy;
use crate::security::SecretHasher;
use crate::store::WalletStore;

use super::SignUpCommand;

/// Handler for account lifecycle operations
pub struct UserHandler {
    store: WalletStore,
    hasher: SecretHasher,
    policy: WalletPolicy,
    clock: Clock,
}

impl UserHandler {
    pub fn new(pool: PgPool, policy: WalletPolicy) -> Self {
        Self {
            store: WalletStore::new(pool),
            hasher: SecretHasher,
            policy,
            clock: Clock,
        }
    }

    /// Open a new account. The Admin account is unique system-wide and
    /// seeds the configured opening balance; every other type starts at
    /// zero.
    pub async fn sign_up(&self, command: SignUpCommand) -> AppResult<Account> {
        validate::phone(command.phone_number)?;
        validate::user_name(&command.user_name)?;
        validate::email(&command.email_address)?;
        validate::password(&command.password)?;
        let account_type = AccountType::parse(&command.account_type).ok_or_else(|| {
            WalletError::InvalidInput(
                "Account Type Has To Be Personal/Business/Utility/Service/Charity/Investment/Admin."
                    .to_string(),
            )
        })?;

        if self
            .store
            .find_by_email(&command.email_address)
            .await?
            .is_some()
        {
            return Err(WalletError::EmailTaken(command.email_address).into());
        }
        if self
            .store
            .find_by_phone(command.phone_number)
            .await?
            .is_some()
        {
            return Err(WalletError::PhoneTaken(command.phone_number).into());
        }

        let user_name = normalize_name(&command.user_name);
        if matches!(account_type, AccountType::Investment | AccountType::Service)
            && self
                .store
                .find_by_name_and_type(&user_name, account_type)
                .await?
                .is_some()
        {
            return Err(WalletError::AccountNameTaken { account_type }.into());
        }
        if account_type == AccountType::Admin && self.store.find_admin().await?.is_some() {
            return Err(WalletError::AdminExists.into());
        }

        let opening_balance = if account_type == AccountType::Admin {
            self.policy.admin_initial_balance
        } else {
            Decimal::ZERO
        };
        let password_hash = self.hasher.hash(&command.password)?;
        let account = Account::new(
            command.phone_number,
            user_name,
            command.email_address,
            password_hash,
            account_type,
            opening_balance,
            self.clock.stamp(),
        );
        self.store.insert(&account).await?;

        tracing::info!(phone = account.phone(), account_type = %account.account_type(), "Account created");
        Ok(account)
    }

    /// Verify credentials. Signing in to an Inactive account reactivates
    /// it exactly once; an Active account is returned unchanged.
    pub async fn authenticate(&self, phone: i64, password: &str) -> AppResult<Account> {
        let mut account = self.find(phone).await?;
        if !self.hasher.verify(password, account.password_hash()) {
            return Err(WalletError::IncorrectPassword.into());
        }

        if !account.is_active() {
            account.reactivate(self.clock.stamp());
            self.store.replace(&mut account).await?;
            tracing::info!(phone, "Account reactivated on sign-in");
        }
        Ok(account)
    }

    pub async fn get(&self, phone: i64) -> AppResult<Account> {
        self.find(phone).await
    }

    pub async fn update_name(&self, phone: i64, new_name: &str) -> AppResult<Account> {
        validate::user_name(new_name)?;
        let mut account = self.find_active(phone).await?;
        if new_name.eq_ignore_ascii_case(account.user_name()) {
            return Err(WalletError::Unchanged(ProfileField::Name).into());
        }

        account.rename(normalize_name(new_name), self.clock.stamp());
        self.store.replace(&mut account).await?;
        Ok(account)
    }

    pub async fn update_email(&self, phone: i64, new_email: &str) -> AppResult<Account> {
        validate::email(new_email)?;
        let mut account = self.find_active(phone).await?;
        if new_email == account.email() {
            return Err(WalletError::Unchanged(ProfileField::Email).into());
        }
        if self.store.find_by_email(new_email).await?.is_some() {
            return Err(WalletError::EmailTaken(new_email.to_string()).into());
        }

        account.change_email(new_email.to_string(), self.clock.stamp());
        self.store.replace(&mut account).await?;
        Ok(account)
    }

    pub async fn update_password(
        &self,
        phone: i64,
        password: &str,
        new_password: &str,
    ) -> AppResult<Account> {
        validate::password(new_password)?;
        let mut account = self.find_active(phone).await?;
        if !self.hasher.verify(password, account.password_hash()) {
            return Err(WalletError::IncorrectPassword.into());
        }
        if self.hasher.verify(new_password, account.password_hash()) {
            return Err(WalletError::Unchanged(ProfileField::Password).into());
        }

        let password_hash = self.hasher.hash(new_password)?;
        account.change_password(password_hash, self.clock.stamp());
        self.store.replace(&mut account).await?;
        Ok(account)
    }

    /// Phone updates re-key the aggregate: the old row is deleted and the
    /// new one inserted within a single transaction.
    pub async fn update_phone(
        &self,
        phone: i64,
        password: &str,
        new_phone: i64,
    ) -> AppResult<Account> {
        validate::phone(new_phone)?;
        let mut account = self.find_active(phone).await?;
        if !self.hasher.verify(password, account.password_hash()) {
            return Err(WalletError::IncorrectPassword.into());
        }
        if new_phone == account.phone() {
            return Err(WalletError::Unchanged(ProfileField::Phone).into());
        }
        if self.store.find_by_phone(new_phone).await?.is_some() {
            return Err(WalletError::PhoneTaken(new_phone).into());
        }

        account.change_phone(new_phone, self.clock.stamp());
        self.store.rekey(phone, &mut account).await?;
        tracing::info!(old_phone = phone, new_phone, "Account re-keyed");
        Ok(account)
    }

    /// Soft-delete: requires the correct password, never removes the
    /// record and never touches the Admin account.
    pub async fn delete(&self, phone: i64, password: &str) -> AppResult<Account> {
        let mut account = self.find_active(phone).await?;
        if !self.hasher.verify(password, account.password_hash()) {
            return Err(WalletError::IncorrectPassword.into());
        }
        if account.account_type() == AccountType::Admin {
            return Err(WalletError::DeleteAdmin.into());
        }

        account.deactivate(self.clock.stamp());
        self.store.replace(&mut account).await?;
        tracing::info!(phone, "Account deactivated");
        Ok(account)
    }

    /// "Choose a payee" view: every account except the requester and the
    /// Admin pool.
    pub async fn payees(&self, phone: i64) -> AppResult<Vec<Account>> {
        let all = self.store.find_all().await?;
        if all.is_empty() {
            return Err(WalletError::NoUsersFound.into());
        }

        let payees: Vec<Account> = all
            .into_iter()
            .filter(|account| account.phone() != phone)
            .filter(|account| account.account_type() != AccountType::Admin)
            .collect();
        if payees.is_empty() {
            return Err(WalletError::NoAccountsFound.into());
        }
        Ok(payees)
    }

    /// Full account listing, restricted to the Admin identity.
    pub async fn all_users(&self, requester_phone: i64) -> AppResult<Vec<Account>> {
        let requester = self.find(requester_phone).await?;
        if requester.account_type() != AccountType::Admin {
            return Err(WalletError::NonAdminAccount.into());
        }

        let all = self.store.find_all().await?;
        if all.is_empty() {
            return Err(WalletError::NoUsersFound.into());
        }
        Ok(all)
    }

    async fn find(&self, phone: i64) -> AppResult<Account> {
        Ok(self
            .store
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(phone.to_string()))?)
    }

    async fn find_active(&self, phone: i64) -> AppResult<Account> {
        let account = self.find(phone).await?;
        if !account.is_active() {
            return Err(WalletError::InactiveAccount(phone.to_string()).into());
        }
        Ok(account)
    }
}
