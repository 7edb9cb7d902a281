//! Wallet Store
//!
//! Persists each account aggregate as one JSONB document keyed by phone
//! number, with lookup columns kept in sync on every write. Replaces use
//! optimistic version checks so two concurrent mutations of the same
//! account cannot both win; multi-aggregate money movements commit in a
//! single database transaction.

use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{Account, AccountType};

/// Storage-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt account document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Version conflict for account {phone}: concurrent modification detected")]
    VersionConflict { phone: i64 },
}

/// Postgres-backed account store.
#[derive(Debug, Clone)]
pub struct WalletStore {
    pool: PgPool,
}

impl WalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn find_by_phone(&self, phone: i64) -> Result<Option<Account>, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM wallet_accounts WHERE phone = $1")
                .bind(phone)
                .fetch_optional(&self.pool)
                .await?;
        Self::decode_optional(row)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM wallet_accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Self::decode_optional(row)
    }

    pub async fn find_by_name_and_type(
        &self,
        user_name: &str,
        account_type: AccountType,
    ) -> Result<Option<Account>, StoreError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            "SELECT doc FROM wallet_accounts WHERE user_name = $1 AND account_type = $2",
        )
        .bind(user_name)
        .bind(account_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Self::decode_optional(row)
    }

    pub async fn find_by_type(
        &self,
        account_type: AccountType,
    ) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(
            "SELECT doc FROM wallet_accounts WHERE account_type = $1 ORDER BY phone",
        )
        .bind(account_type.as_str())
        .fetch_all(&self.pool)
        .await?;
        Self::decode_all(rows)
    }

    /// The single fee/reward pool account, found by type.
    pub async fn find_admin(&self) -> Result<Option<Account>, StoreError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            "SELECT doc FROM wallet_accounts WHERE account_type = 'Admin' LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Self::decode_optional(row)
    }

    pub async fn find_all(&self) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM wallet_accounts ORDER BY phone")
                .fetch_all(&self.pool)
                .await?;
        Self::decode_all(rows)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let doc = serde_json::to_value(account)?;
        sqlx::query(
            r#"
            INSERT INTO wallet_accounts (phone, user_name, email, account_type, doc, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.phone())
        .bind(account.user_name())
        .bind(account.email())
        .bind(account.account_type().as_str())
        .bind(&doc)
        .bind(account.version())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace one aggregate, bumping its version. Fails with
    /// `VersionConflict` when the stored version moved underneath us.
    pub async fn replace(&self, account: &mut Account) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::replace_in_tx(&mut tx, account).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace several aggregates in one transaction: all of them commit
    /// or none do.
    pub async fn replace_all(&self, accounts: &mut [&mut Account]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for account in accounts.iter_mut() {
            Self::replace_in_tx(&mut tx, account).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Re-key an aggregate onto a new phone number: the old row is deleted
    /// and the new one inserted inside a single transaction.
    pub async fn rekey(&self, old_phone: i64, account: &mut Account) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM wallet_accounts WHERE phone = $1")
            .bind(old_phone)
            .execute(&mut *tx)
            .await?;
        account.bump_version();
        let doc = serde_json::to_value(&*account)?;
        sqlx::query(
            r#"
            INSERT INTO wallet_accounts (phone, user_name, email, account_type, doc, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.phone())
        .bind(account.user_name())
        .bind(account.email())
        .bind(account.account_type().as_str())
        .bind(&doc)
        .bind(account.version())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        account: &mut Account,
    ) -> Result<(), StoreError> {
        let expected = account.version();
        account.bump_version();
        let doc = serde_json::to_value(&*account)?;
        let result = sqlx::query(
            r#"
            UPDATE wallet_accounts
            SET user_name = $2, email = $3, account_type = $4, doc = $5, version = $6
            WHERE phone = $1 AND version = $7
            "#,
        )
        .bind(account.phone())
        .bind(account.user_name())
        .bind(account.email())
        .bind(account.account_type().as_str())
        .bind(&doc)
        .bind(account.version())
        .bind(expected)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                phone: account.phone(),
            });
        }
        Ok(())
    }

    fn decode_optional(
        row: Option<(serde_json::Value,)>,
    ) -> Result<Option<Account>, StoreError> {
        row.map(|(doc,)| serde_json::from_value(doc))
            .transpose()
            .map_err(StoreError::from)
    }

    fn decode_all(rows: Vec<(serde_json::Value,)>) -> Result<Vec<Account>, StoreError> {
        rows.into_iter()
            .map(|(doc,)| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountType;
    use rust_decimal::Decimal;

    fn account() -> Account {
        Account::new(
            6381342954,
            "Anush Raghavender".to_string(),
            "anushraghavender3@gmail.com".to_string(),
            "hash".to_string(),
            AccountType::Personal,
            Decimal::ZERO,
            "06-08-26, 10:30:00".to_string(),
        )
    }

    #[test]
    fn test_document_round_trip() {
        let account = account();
        let doc = serde_json::to_value(&account).unwrap();
        let decoded = WalletStore::decode_optional(Some((doc,))).unwrap().unwrap();
        assert_eq!(decoded.phone(), account.phone());
        assert_eq!(decoded.user_name(), account.user_name());
        assert_eq!(decoded.version(), account.version());
    }

    #[test]
    fn test_decode_rejects_corrupt_document() {
        let result = WalletStore::decode_optional(Some((serde_json::json!({"phone": "x"}),)));
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_decode_absent_row() {
        assert!(WalletStore::decode_optional(None).unwrap().is_none());
    }
}
