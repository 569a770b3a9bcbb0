use crate::domain::entities::TransactionStatus;
use crate::domain::error::LedgerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Unified API error wrapper. `Terminal` transactions derive their HTTP
/// status from `tx.status` rather than a separate error code, since the
/// status field is the governing contract's single source of truth
/// (SPEC_FULL.md §7).
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

fn status_code_for(status: &TransactionStatus) -> StatusCode {
    match status {
        TransactionStatus::Pending | TransactionStatus::PendingConfirmation => StatusCode::ACCEPTED,
        TransactionStatus::Completed => StatusCode::OK,
        TransactionStatus::FailedFunds => StatusCode::BAD_REQUEST,
        TransactionStatus::FailedAccount => StatusCode::NOT_FOUND,
        TransactionStatus::FailedBalanceSvc => StatusCode::SERVICE_UNAVAILABLE,
        TransactionStatus::FailedRemote(code) => {
            if (400..500).contains(code) {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_REQUEST)
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
        TransactionStatus::FailedNetwork => StatusCode::SERVICE_UNAVAILABLE,
        TransactionStatus::FailedUnknown => StatusCode::INTERNAL_SERVER_ERROR,
        TransactionStatus::FailedDebitPostConfirmation => StatusCode::INTERNAL_SERVER_ERROR,
        TransactionStatus::RevertFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TransactionStatus::Reverted(inner) => status_code_for(inner),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LedgerError::InvalidIdempotencyKey => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LedgerError::InvalidAmount => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LedgerError::SelfTransfer => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LedgerError::UnsupportedBank(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LedgerError::RecipientNotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            LedgerError::IdempotencyInconsistency(key) => {
                tracing::error!(idempotency_key = %key, "idempotency key bound to a missing transaction");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal inconsistency".to_string())
            }
            LedgerError::Terminal(tx) => (status_code_for(&tx.status), tx.status.to_string()),
            LedgerError::EventStoreError(e) => {
                tracing::error!(error = %e, "event store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            LedgerError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
