use thiserror::Error;

/// Domain-level errors for both the individual and the group account ledgers.
///
/// Carries no HTTP semantics of its own; the API layer (`api::error`) maps
/// each variant to the status codes of the governing contract.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account '{0}' already exists")]
    AlreadyExists(String),

    #[error("account '{0}' not found")]
    NotFound(String),

    #[error("insufficient funds in account '{0}'")]
    InsufficientFunds(String),

    #[error("amount must be strictly positive")]
    InvalidAmount,

    #[error("repository error: {0}")]
    RepositoryError(String),
}
