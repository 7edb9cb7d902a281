//! API Routes
//!
//! HTTP endpoint definitions. Responses serialize account views without
//! the hashed secrets stored on the aggregates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Account, AuditLog, Card, Transaction};
use crate::error::AppError;
use crate::handlers::{
    AddCardCommand, BankTransferCommand, CardHandler, DepositCommand, PaymentCommand,
    SellInvestmentCommand, SignUpCommand, UserHandler, WalletHandler,
};

use super::AppState;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub phone_number: i64,
    pub user_name: String,
    pub email_address: String,
    pub account_type: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub phone_number: i64,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNameRequest {
    pub new_user_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub new_email_address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePhoneRequest {
    pub password: String,
    pub new_phone_number: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddCardRequest {
    pub card_number: i64,
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

#[derive(Debug, Deserialize)]
pub struct CardActionRequest {
    pub card_number: i64,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub card_number: i64,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BankTransferRequest {
    pub card_number: i64,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub to_phone_number: i64,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SellInvestmentRequest {
    pub investment_account_name: String,
    pub amount: Decimal,
}

// =========================================================================
// Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub card_number: i64,
    pub card_name: String,
    pub card_balance: Decimal,
    pub expiry_date: String,
    pub default_card: bool,
}

impl From<&Card> for CardResponse {
    fn from(card: &Card) -> Self {
        Self {
            card_number: card.number(),
            card_name: card.name().to_string(),
            card_balance: card.balance(),
            expiry_date: card.expiry().to_string(),
            default_card: card.is_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_date_time: String,
    pub from_account_id: i64,
    pub from_account: String,
    pub to_account_id: i64,
    pub to_account: String,
    pub transaction_amount: Decimal,
    pub transaction_type: String,
    pub transaction_reward: String,
    pub transaction_status: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(record: &Transaction) -> Self {
        Self {
            transaction_date_time: record.stamp().to_string(),
            from_account_id: record.from_id(),
            from_account: record.from_name().to_string(),
            to_account_id: record.to_id(),
            to_account: record.to_name().to_string(),
            transaction_amount: record.amount(),
            transaction_type: record.type_label(),
            transaction_reward: record.reward_label(),
            transaction_status: record.status_label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub date_time: String,
    pub action: String,
    pub status: String,
}

impl From<&AuditLog> for LogResponse {
    fn from(log: &AuditLog) -> Self {
        Self {
            date_time: log.stamp().to_string(),
            action: log.action().to_string(),
            status: log.status().to_string(),
        }
    }
}

/// Full account view. Password and CVV digests never leave the service.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub phone_number: i64,
    pub user_name: String,
    pub email_address: String,
    pub account_type: String,
    pub account_status: String,
    pub account_balance: Decimal,
    pub rewards: Decimal,
    pub total_transfers: Decimal,
    pub total_payments: Decimal,
    pub total_bills: Decimal,
    pub total_services: Decimal,
    pub total_investments: Decimal,
    pub total_donations: Decimal,
    pub creation_date_time: String,
    pub activation_date_time: String,
    pub deletion_date_time: String,
    pub cards: Vec<CardResponse>,
    pub transactions: Vec<TransactionResponse>,
    pub logs: Vec<LogResponse>,
    pub donations: BTreeMap<String, Decimal>,
    pub investments: BTreeMap<String, Decimal>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            phone_number: account.phone(),
            user_name: account.user_name().to_string(),
            email_address: account.email().to_string(),
            account_type: account.account_type().to_string(),
            account_status: format!("{:?}", account.status()),
            account_balance: account.balance(),
            rewards: account.rewards(),
            total_transfers: account.total_transfers(),
            total_payments: account.total_payments(),
            total_bills: account.total_bills(),
            total_services: account.total_services(),
            total_investments: account.total_investments(),
            total_donations: account.total_donations(),
            creation_date_time: account.created_at().to_string(),
            activation_date_time: account.activated_at().to_string(),
            deletion_date_time: account.deleted_at().to_string(),
            cards: account.cards().iter().map(CardResponse::from).collect(),
            transactions: account
                .transactions()
                .iter()
                .map(TransactionResponse::from)
                .collect(),
            logs: account.logs().iter().map(LogResponse::from).collect(),
            donations: account.donations().clone(),
            investments: account.investments().clone(),
        }
    }
}

/// Compact listing entry for the "choose a payee" view.
#[derive(Debug, Serialize)]
pub struct PayeeResponse {
    pub phone_number: i64,
    pub user_name: String,
    pub email_address: String,
    pub account_type: String,
}

impl From<&Account> for PayeeResponse {
    fn from(account: &Account) -> Self {
        Self {
            phone_number: account.phone(),
            user_name: account.user_name().to_string(),
            email_address: account.email().to_string(),
            account_type: account.account_type().to_string(),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // User lifecycle
        .route("/user/signup", post(sign_up))
        .route("/user/signin", post(sign_in))
        .route("/user/:phone", get(get_user).delete(delete_account))
        .route("/user/:phone/name", patch(update_name))
        .route("/user/:phone/email", patch(update_email))
        .route("/user/:phone/password", patch(update_password))
        .route("/user/:phone/phone", patch(update_phone))
        // Listings
        .route("/accounts/:phone", get(get_payees))
        .route("/admin/users/:phone", get(get_all_users))
        // Card subsystem
        .route("/card/:phone", post(add_card).delete(remove_card))
        .route("/card/:phone/default", patch(set_default_card))
        // Ledger operations
        .route("/wallet/:phone/deposit", put(deposit))
        .route("/wallet/:phone/banktransfer", put(bank_transfer))
        .route("/wallet/:phone/payment", put(payment))
        .route("/wallet/:phone/sellinvestment", put(sell_investment))
}

// =========================================================================
// User lifecycle
// =========================================================================

async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let command = SignUpCommand {
        phone_number: request.phone_number,
        user_name: request.user_name,
        email_address: request.email_address,
        account_type: request.account_type,
        password: request.password,
    };
    let account = handler.sign_up(command).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler
        .authenticate(request.phone_number, &request.password)
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler.get(phone).await?;
    Ok(Json(AccountResponse::from(&account)))
}

async fn update_name(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<UpdateNameRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler.update_name(phone, &request.new_user_name).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn update_email(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<UpdateEmailRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler.update_email(phone, &request.new_email_address).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn update_password(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler
        .update_password(phone, &request.password, &request.new_password)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn update_phone(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<UpdatePhoneRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler
        .update_phone(phone, &request.password, request.new_phone_number)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let account = handler.delete(phone, &request.password).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

// =========================================================================
// Listings
// =========================================================================

async fn get_payees(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
) -> Result<Json<Vec<PayeeResponse>>, AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let payees = handler.payees(phone).await?;
    Ok(Json(payees.iter().map(PayeeResponse::from).collect()))
}

async fn get_all_users(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let handler = UserHandler::new(state.pool, state.policy);
    let users = handler.all_users(phone).await?;
    Ok(Json(users.iter().map(AccountResponse::from).collect()))
}

// =========================================================================
// Card subsystem
// =========================================================================

async fn add_card(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<AddCardRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = CardHandler::new(state.pool, state.policy);
    let command = AddCardCommand {
        card_number: request.card_number,
        card_name: request.card_name,
        expiry_month: request.expiry_month,
        expiry_year: request.expiry_year,
        cvv: request.cvv,
    };
    let account = handler.add_card(phone, command).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

async fn set_default_card(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<CardActionRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = CardHandler::new(state.pool, state.policy);
    let account = handler.set_default_card(phone, request.card_number).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn remove_card(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<CardActionRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = CardHandler::new(state.pool, state.policy);
    let account = handler.remove_card(phone, request.card_number).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

// =========================================================================
// Ledger operations
// =========================================================================

async fn deposit(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = WalletHandler::new(state.pool, state.policy, state.notifier);
    let command = DepositCommand {
        card_number: request.card_number,
        amount: request.amount,
    };
    let account = handler.deposit(phone, command).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn bank_transfer(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<BankTransferRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = WalletHandler::new(state.pool, state.policy, state.notifier);
    let command = BankTransferCommand {
        card_number: request.card_number,
        amount: request.amount,
    };
    let account = handler.bank_transfer(phone, command).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn payment(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = WalletHandler::new(state.pool, state.policy, state.notifier);
    let command = PaymentCommand {
        to_phone_number: request.to_phone_number,
        amount: request.amount,
    };
    let account = handler.payment(phone, command).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

async fn sell_investment(
    State(state): State<AppState>,
    Path(phone): Path<i64>,
    Json(request): Json<SellInvestmentRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = WalletHandler::new(state.pool, state.policy, state.notifier);
    let command = SellInvestmentCommand {
        investment_account_name: request.investment_account_name,
        amount: request.amount,
    };
    let account = handler.sell_investment(phone, command).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountType, Clock};

    #[test]
    fn test_sign_up_request_deserialize() {
        let json = r#"{
            "phone_number": 6381342954,
            "user_name": "Anush Raghavender",
            "email_address": "anushraghavender3@gmail.com",
            "account_type": "Personal",
            "password": "anush12345$"
        }"#;

        let request: SignUpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.phone_number, 6381342954);
        assert_eq!(request.account_type, "Personal");
    }

    #[test]
    fn test_payment_request_deserialize() {
        let json = r#"{"to_phone_number": 7358440894, "amount": 100.50}"#;
        let request: PaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, Decimal::new(10050, 2));
    }

    #[test]
    fn test_account_response_hides_secrets() {
        let account = Account::new(
            6381342954,
            "Anush Raghavender".to_string(),
            "anushraghavender3@gmail.com".to_string(),
            "super-secret-hash".to_string(),
            AccountType::Personal,
            Decimal::ZERO,
            Clock.stamp(),
        );
        let response = AccountResponse::from(&account);
        let body = serde_json::to_string(&response).unwrap();
        assert!(!body.contains("super-secret-hash"));
        assert!(body.contains("anushraghavender3@gmail.com"));
        assert_eq!(response.account_status, "Active");
    }
}
