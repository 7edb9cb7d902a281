//! Command definitions
//!
//! Commands represent intentions to change the system state. The
//! initiating identity (a verified phone number) arrives separately from
//! the session layer and is never part of the command body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Command to open a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpCommand {
    pub phone_number: i64,
    pub user_name: String,
    pub email_address: String,
    pub account_type: String,
    pub password: String,
}

/// Command to attach a payment card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCardCommand {
    pub card_number: i64,
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

/// Command to move money from a card into the wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCommand {
    pub card_number: i64,
    pub amount: Decimal,
}

/// Command to move wallet balance back onto a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransferCommand {
    pub card_number: i64,
    pub amount: Decimal,
}

/// Command to pay another wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCommand {
    pub to_phone_number: i64,
    pub amount: Decimal,
}

/// Command to liquidate part of an investment position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellInvestmentCommand {
    pub investment_account_name: String,
    pub amount: Decimal,
}
