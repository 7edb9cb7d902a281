//! Database module
//!
//! Connection and schema verification utilities. Schema DDL lives in raw
//! SQL files under migrations/.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if the required table exists
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'wallet_accounts'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !exists {
        tracing::error!("Required table 'wallet_accounts' does not exist. Run migrations.");
        return Ok(false);
    }

    check_admin_account(pool).await?;
    Ok(true)
}

/// Payments need the single Admin fee/reward pool account. Its absence is
/// not fatal at startup (it is created through signup) but worth flagging.
async fn check_admin_account(pool: &PgPool) -> Result<(), sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM wallet_accounts WHERE account_type = 'Admin')",
    )
    .fetch_one(pool)
    .await?;

    if exists {
        tracing::info!("Admin account verified");
    } else {
        tracing::warn!("No Admin account found; payments will fail until one is created");
    }
    Ok(())
}
