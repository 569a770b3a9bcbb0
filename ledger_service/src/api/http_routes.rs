use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::domain::entities::Transaction;
use crate::domain::error::LedgerError;
use crate::use_cases::contribution::ContributionUseCase;
use crate::use_cases::deposit::DepositUseCase;
use crate::use_cases::get_history::GetHistoryUseCase;
use crate::use_cases::interbank_transfer::InterbankTransferUseCase;
use crate::use_cases::p2p_transfer::P2pTransferUseCase;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub struct AppState {
    pub deposit: Arc<DepositUseCase>,
    pub p2p_transfer: Arc<P2pTransferUseCase>,
    pub contribution: Arc<ContributionUseCase>,
    pub interbank_transfer: Arc<InterbankTransferUseCase>,
    pub get_history: Arc<GetHistoryUseCase>,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/deposit", post(deposit))
        .route("/transfer/p2p", post(p2p_transfer))
        .route("/contribute", post(contribute))
        .route("/transfer", post(interbank_transfer))
        .route("/transactions/me", get(history))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

fn idempotency_key(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ApiError(LedgerError::InvalidIdempotencyKey))
}

fn user_id_header(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiError(LedgerError::Internal("missing X-User-Id header".to_string())))
}

fn parse_amount(raw: Decimal) -> Result<common::Money, ApiError> {
    common::Money::positive(raw).map_err(|_| ApiError(LedgerError::InvalidAmount))
}

#[derive(Deserialize)]
struct DepositRequest {
    user_id: String,
    amount: Decimal,
}

#[tracing::instrument(skip(state, headers))]
async fn deposit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<DepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let amount = parse_amount(body.amount)?;
    let tx = state.deposit.execute(key, body.user_id, amount).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tx))))
}

#[derive(Deserialize)]
struct P2pTransferRequest {
    user_id: String,
    destination_phone_number: String,
    amount: Decimal,
}

#[tracing::instrument(skip(state, headers))]
async fn p2p_transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<P2pTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let amount = parse_amount(body.amount)?;
    let tx = state
        .p2p_transfer
        .execute(key, body.user_id, body.destination_phone_number, amount)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tx))))
}

#[derive(Deserialize)]
struct ContributeRequest {
    user_id: String,
    group_id: String,
    amount: Decimal,
}

#[tracing::instrument(skip(state, headers))]
async fn contribute(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ContributeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let amount = parse_amount(body.amount)?;
    let tx = state
        .contribution
        .execute(key, body.user_id, body.group_id, amount)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tx))))
}

#[derive(Deserialize)]
struct InterbankTransferRequest {
    user_id: String,
    to_bank: String,
    destination_phone_number: String,
    amount: Decimal,
    #[serde(default)]
    description: String,
}

#[tracing::instrument(skip(state, headers))]
async fn interbank_transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<InterbankTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let amount = parse_amount(body.amount)?;
    let tx = state
        .interbank_transfer
        .execute(
            key,
            body.user_id,
            body.to_bank,
            body.destination_phone_number,
            amount,
            body.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tx))))
}

#[tracing::instrument(skip(state, headers))]
async fn history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, ApiError> {
    let user_id = user_id_header(&headers)?;
    let history = state.get_history.execute(&user_id, 50).await?;
    Ok(Json(ApiResponse::success(history)))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn metrics() -> StatusCode {
    StatusCode::OK
}
