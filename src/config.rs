//! Configuration module
//!
//! Loads server configuration from environment variables and assembles the
//! immutable wallet policy injected into the ledger engine.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::ledger::WalletPolicy;
use crate::notify::SmtpSettings;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Business constants for the ledger engine
    pub policy: WalletPolicy,

    /// SMTP settings; None disables transaction emails
    pub smtp: Option<SmtpSettings>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let defaults = WalletPolicy::default();
        let policy = WalletPolicy {
            admin_initial_balance: decimal_env("ADMIN_INITIAL_BALANCE", defaults.admin_initial_balance)?,
            card_initial_balance: decimal_env("CARD_INITIAL_BALANCE", defaults.card_initial_balance)?,
            transaction_cost: decimal_env("TRANSACTION_COST", defaults.transaction_cost)?,
            reward_percentage: decimal_env("REWARD_PERCENTAGE", defaults.reward_percentage)?,
            donation_bonus: decimal_env("DONATION_BONUS", defaults.donation_bonus)?,
            sender_reward_threshold: decimal_env(
                "SENDER_REWARD_THRESHOLD",
                defaults.sender_reward_threshold,
            )?,
            business_reward_threshold: decimal_env(
                "BUSINESS_REWARD_THRESHOLD",
                defaults.business_reward_threshold,
            )?,
        };

        let smtp = smtp_from_env()?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            policy,
            smtp,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn decimal_env(name: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    match env::var(name) {
        Ok(raw) => Decimal::from_str(&raw).map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// SMTP settings are all-or-nothing: a partial set is a configuration
/// error rather than a silently disabled mailer.
fn smtp_from_env() -> Result<Option<SmtpSettings>, ConfigError> {
    let vars = [
        "SMTP_SERVER",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_FROM",
    ];
    let present = vars.iter().filter(|name| env::var(name).is_ok()).count();
    if present == 0 {
        return Ok(None);
    }
    if present < vars.len() {
        return Err(ConfigError::MissingEnv("SMTP_* (partial SMTP configuration)"));
    }

    let port = env::var("SMTP_PORT")
        .map_err(|_| ConfigError::MissingEnv("SMTP_PORT"))?
        .parse()
        .map_err(|_| ConfigError::InvalidValue("SMTP_PORT"))?;

    Ok(Some(SmtpSettings {
        server: env::var("SMTP_SERVER").map_err(|_| ConfigError::MissingEnv("SMTP_SERVER"))?,
        port,
        username: env::var("SMTP_USERNAME").map_err(|_| ConfigError::MissingEnv("SMTP_USERNAME"))?,
        password: env::var("SMTP_PASSWORD").map_err(|_| ConfigError::MissingEnv("SMTP_PASSWORD"))?,
        from: env::var("SMTP_FROM").map_err(|_| ConfigError::MissingEnv("SMTP_FROM"))?,
    }))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = WalletPolicy::default();
        assert_eq!(policy.card_initial_balance, Decimal::new(5000, 0));
        assert_eq!(policy.transaction_cost, Decimal::new(5, 0));
        assert_eq!(policy.reward_percentage, Decimal::new(2, 2));
        assert_eq!(policy.sender_reward_threshold, Decimal::new(500, 0));
        assert_eq!(policy.business_reward_threshold, Decimal::new(1000, 0));
    }
}
