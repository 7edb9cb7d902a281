//! Domain Error Types
//!
//! Business rule violations surfaced by the ledger engine, the card
//! subsystem and the user lifecycle. Independent of the web layer; the
//! HTTP mapping lives in `crate::error`.

use thiserror::Error;

use super::account::AccountType;
use super::money::AmountError;

/// Profile field named by an "unchanged value" rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Password,
    Phone,
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProfileField::Name => "User Name",
            ProfileField::Email => "Email Address",
            ProfileField::Password => "Password",
            ProfileField::Phone => "Phone Number",
        };
        write!(f, "{label}")
    }
}

/// Coarse error taxonomy used for HTTP status mapping and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Expired,
    ReadOnly,
    Inactive,
    InsufficientBalance,
    InvalidInput,
    Unchanged,
    Forbidden,
    Unauthenticated,
}

/// Business errors raised by wallet operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    #[error("User Account With \"{0}\" Not Found")]
    AccountNotFound(String),

    #[error("Admin Account Not Found")]
    AdminNotFound,

    #[error("No Cards Found For Account")]
    NoCardsFound,

    #[error("Card Number \"{0}\" Not Found")]
    CardNotFound(i64),

    #[error("No Users Found")]
    NoUsersFound,

    #[error("No Accounts Found")]
    NoAccountsFound,

    #[error("User With Email Address \"{0}\" Already Exists")]
    EmailTaken(String),

    #[error("User With Phone Number \"{0}\" Already Exists")]
    PhoneTaken(i64),

    #[error("Card Number \"{0}\" Already Exists")]
    CardExists(i64),

    #[error("{account_type} Account Name Already Taken")]
    AccountNameTaken { account_type: AccountType },

    #[error("Admin Account Already Exists")]
    AdminExists,

    #[error("Card With Expiry \"{0}\" Is Expired")]
    CardExpired(String),

    #[error("User Account With \"{0}\" Is Read Only")]
    ReadOnlyAccount(i64),

    #[error("User Account With \"{0}\" Is Inactive")]
    InactiveAccount(String),

    #[error("Amount To Deposit Greater Than Card Balance")]
    InsufficientCardBalance,

    #[error("Amount To Transfer Greater Than Wallet Balance")]
    InsufficientWalletBalance,

    #[error("Investment Sale Amount Greater Than Investment Balance")]
    InsufficientInvestmentBalance,

    #[error("{0}")]
    InvalidInput(String),

    #[error("New {0} Same As Old {0}")]
    Unchanged(ProfileField),

    #[error("Entered Password Does Not Match With User Password")]
    IncorrectPassword,

    #[error("Amount Cannot Be Paid To Own Account")]
    SelfPayment,

    #[error("Amount Cannot Be Paid To Admin")]
    PayToAdmin,

    #[error("Cannot Delete Admin Account")]
    DeleteAdmin,

    #[error("Default Card \"{0}\" Cannot Be Deleted")]
    DefaultCardUndeletable(i64),

    #[error("Account Type Is Not Admin")]
    NonAdminAccount,
}

impl WalletError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_)
            | Self::AdminNotFound
            | Self::NoCardsFound
            | Self::CardNotFound(_)
            | Self::NoUsersFound
            | Self::NoAccountsFound => ErrorKind::NotFound,

            Self::EmailTaken(_)
            | Self::PhoneTaken(_)
            | Self::CardExists(_)
            | Self::AccountNameTaken { .. }
            | Self::AdminExists => ErrorKind::AlreadyExists,

            Self::CardExpired(_) => ErrorKind::Expired,
            Self::ReadOnlyAccount(_) => ErrorKind::ReadOnly,
            Self::InactiveAccount(_) => ErrorKind::Inactive,

            Self::InsufficientCardBalance
            | Self::InsufficientWalletBalance
            | Self::InsufficientInvestmentBalance => ErrorKind::InsufficientBalance,

            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unchanged(_) => ErrorKind::Unchanged,
            Self::IncorrectPassword => ErrorKind::Unauthenticated,

            Self::SelfPayment
            | Self::PayToAdmin
            | Self::DeleteAdmin
            | Self::DefaultCardUndeletable(_)
            | Self::NonAdminAccount => ErrorKind::Forbidden,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "account_not_found",
            Self::AdminNotFound => "admin_not_found",
            Self::NoCardsFound => "no_cards_found",
            Self::CardNotFound(_) => "card_not_found",
            Self::NoUsersFound => "no_users_found",
            Self::NoAccountsFound => "no_accounts_found",
            Self::EmailTaken(_) => "email_already_exists",
            Self::PhoneTaken(_) => "phone_already_exists",
            Self::CardExists(_) => "card_already_exists",
            Self::AccountNameTaken { .. } => "account_name_taken",
            Self::AdminExists => "admin_already_exists",
            Self::CardExpired(_) => "card_expired",
            Self::ReadOnlyAccount(_) => "read_only_account",
            Self::InactiveAccount(_) => "inactive_account",
            Self::InsufficientCardBalance => "insufficient_card_balance",
            Self::InsufficientWalletBalance => "insufficient_wallet_balance",
            Self::InsufficientInvestmentBalance => "insufficient_investment_balance",
            Self::InvalidInput(_) => "invalid_input",
            Self::Unchanged(_) => "value_unchanged",
            Self::IncorrectPassword => "incorrect_password",
            Self::SelfPayment => "self_payment",
            Self::PayToAdmin => "cannot_pay_to_admin",
            Self::DeleteAdmin => "cannot_delete_admin",
            Self::DefaultCardUndeletable(_) => "cannot_delete_default_card",
            Self::NonAdminAccount => "non_admin_account",
        }
    }
}

impl From<AmountError> for WalletError {
    fn from(err: AmountError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind() {
        assert_eq!(
            WalletError::AccountNotFound("6381342954".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(WalletError::AdminNotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_balance_errors_share_kind() {
        assert_eq!(
            WalletError::InsufficientCardBalance.kind(),
            ErrorKind::InsufficientBalance
        );
        assert_eq!(
            WalletError::InsufficientInvestmentBalance.kind(),
            ErrorKind::InsufficientBalance
        );
    }

    #[test]
    fn test_unchanged_message_names_field() {
        let err = WalletError::Unchanged(ProfileField::Email);
        assert_eq!(err.to_string(), "New Email Address Same As Old Email Address");
        assert_eq!(err.kind(), ErrorKind::Unchanged);
    }

    #[test]
    fn test_amount_error_becomes_invalid_input() {
        let err: WalletError = AmountError::Overflow.into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_forbidden_kind() {
        assert_eq!(WalletError::PayToAdmin.kind(), ErrorKind::Forbidden);
        assert_eq!(WalletError::DeleteAdmin.kind(), ErrorKind::Forbidden);
        assert_eq!(
            WalletError::DefaultCardUndeletable(4486770098076615).kind(),
            ErrorKind::Forbidden
        );
    }
}
