use crate::domain::error::AccountError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Wraps [`AccountError`] for the HTTP boundary, mapping each variant to the
/// status codes SPEC_FULL.md §6.1 assigns to BA's own surface.
pub struct ApiError(pub AccountError);

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            AccountError::NotFound(id) => (StatusCode::NOT_FOUND, format!("account '{id}' not found")),
            AccountError::AlreadyExists(id) => {
                (StatusCode::CONFLICT, format!("account '{id}' already exists"))
            }
            AccountError::InsufficientFunds(id) => (
                StatusCode::BAD_REQUEST,
                format!("insufficient funds in account '{id}'"),
            ),
            AccountError::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                "amount must be strictly positive".to_string(),
            ),
            AccountError::RepositoryError(msg) => {
                tracing::error!(error = %msg, "balance authority repository error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}
