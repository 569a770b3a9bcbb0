use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::domain::entities::{Account, GroupAccount};
use crate::use_cases::{
    check_funds::CheckFundsUseCase, create_account::CreateAccountUseCase,
    create_group_account::CreateGroupAccountUseCase, credit::CreditUseCase, debit::DebitUseCase,
    get_balance::GetBalanceUseCase, group_operations::GroupAccountUseCases,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::{CurrencyError, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub create_account: Arc<CreateAccountUseCase>,
    pub create_group_account: Arc<CreateGroupAccountUseCase>,
    pub get_balance: Arc<GetBalanceUseCase>,
    pub check_funds: Arc<CheckFundsUseCase>,
    pub credit: Arc<CreditUseCase>,
    pub debit: Arc<DebitUseCase>,
    pub group: Arc<GroupAccountUseCases>,
    pub default_currency: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{user_id}", get(get_account))
        .route("/balance/check", post(check_balance))
        .route("/balance/credit", post(credit_balance))
        .route("/balance/debit", post(debit_balance))
        .route("/group_accounts", post(create_group_account))
        .route("/group_accounts/{group_id}", get(get_group_account))
        .route("/group_balance/check", post(check_group_balance))
        .route("/group_balance/credit", post(credit_group_balance))
        .route("/group_balance/debit", post(debit_group_balance))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct AccountResponse {
    user_id: String,
    balance: String,
    currency: String,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            user_id: a.user_id,
            balance: a.balance.to_string(),
            currency: a.currency,
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupAccountResponse {
    group_id: String,
    balance: String,
    currency: String,
    version: i32,
}

impl From<GroupAccount> for GroupAccountResponse {
    fn from(a: GroupAccount) -> Self {
        Self {
            group_id: a.group_id,
            balance: a.balance.to_string(),
            currency: a.currency,
            version: a.version,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateGroupAccountRequest {
    group_id: String,
}

#[derive(Debug, Deserialize)]
struct UserAmountRequest {
    user_id: String,
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct GroupAmountRequest {
    group_id: String,
    amount: Decimal,
}

fn parse_amount(amount: Decimal) -> Result<Money, ApiError> {
    Money::positive(amount).map_err(|e| match e {
        CurrencyError::NotPositive => ApiError(crate::domain::error::AccountError::InvalidAmount),
        CurrencyError::InvalidCurrencyCode(_) => unreachable!("amount parsing never validates currency codes"),
    })
}

async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    let account = state
        .create_account
        .execute(&req.user_id, &state.default_currency)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(account.into())),
    ))
}

async fn get_account(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.get_balance.execute(&user_id).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn check_balance(
    State(state): State<AppState>,
    Json(req): Json<UserAmountRequest>,
) -> Result<StatusCode, ApiError> {
    let amount = parse_amount(req.amount)?;
    state.check_funds.execute(&req.user_id, amount).await?;
    Ok(StatusCode::OK)
}

async fn credit_balance(
    State(state): State<AppState>,
    Json(req): Json<UserAmountRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let amount = parse_amount(req.amount)?;
    let account = state.credit.execute(&req.user_id, amount).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn debit_balance(
    State(state): State<AppState>,
    Json(req): Json<UserAmountRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let amount = parse_amount(req.amount)?;
    let account = state.debit.execute(&req.user_id, amount).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn create_group_account(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupAccountResponse>>), ApiError> {
    let account = state
        .create_group_account
        .execute(&req.group_id, &state.default_currency)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(account.into())),
    ))
}

async fn get_group_account(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<ApiResponse<GroupAccountResponse>>, ApiError> {
    let account = state.group.get_balance(&group_id).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn check_group_balance(
    State(state): State<AppState>,
    Json(req): Json<GroupAmountRequest>,
) -> Result<StatusCode, ApiError> {
    let amount = parse_amount(req.amount)?;
    state.group.check_funds(&req.group_id, amount).await?;
    Ok(StatusCode::OK)
}

async fn credit_group_balance(
    State(state): State<AppState>,
    Json(req): Json<GroupAmountRequest>,
) -> Result<Json<ApiResponse<GroupAccountResponse>>, ApiError> {
    let amount = parse_amount(req.amount)?;
    let account = state.group.credit(&req.group_id, amount).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn debit_group_balance(
    State(state): State<AppState>,
    Json(req): Json<GroupAmountRequest>,
) -> Result<Json<ApiResponse<GroupAccountResponse>>, ApiError> {
    let amount = parse_amount(req.amount)?;
    let account = state.group.debit(&req.group_id, amount).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
