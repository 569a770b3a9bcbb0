use async_trait::async_trait;
use common::Money;
use thiserror::Error;
use uuid::Uuid;

/// Classification of a collaborator call's failure, shared across BA/RD/IG
/// adapters so saga code can pattern-match on *kind* of failure rather than
/// on which collaborator produced it.
#[derive(Debug, Error, Clone)]
pub enum RemoteError {
    #[error("account not found")]
    NotFound,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("remote collaborator rejected the request with status {0}")]
    Rejected(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Port to the Balance Authority. One trait covers both individual and
/// group accounts (the contract's credit/debit/check operations are
/// symmetric across the two), rather than two near-identical traits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceGateway: Send + Sync {
    async fn check_funds(&self, user_id: &str, amount: Money) -> Result<(), RemoteError>;
    async fn credit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError>;
    async fn debit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError>;

    async fn check_group_funds(&self, group_id: &str, amount: Money) -> Result<(), RemoteError>;
    async fn credit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError>;
    async fn debit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError>;
}

/// Port to the Recipient Directory. Read-only, must be called outside any
/// database transaction because it is a remote call (SPEC_FULL.md §4.4).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientDirectoryGateway: Send + Sync {
    async fn lookup_by_phone(&self, phone: &str) -> Result<String, RemoteError>;
}

/// An outbound transfer intent to the Interbank Gateway. `transaction_id` is
/// always the local transaction id, used as the correlation id on the wire.
#[derive(Debug, Clone)]
pub struct InterbankIntent {
    pub origin_bank: String,
    pub origin_account_id: String,
    pub destination_bank: String,
    pub destination_phone_number: String,
    pub amount: Money,
    pub currency: String,
    pub transaction_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct InterbankAcceptance {
    pub remote_tx_id: String,
}

/// Port to the Interbank Gateway. Does not retry internally; for interbank
/// transfers retries are the LO's decision and are suppressed to avoid
/// double-posting (SPEC_FULL.md §4.5).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterbankGateway: Send + Sync {
    async fn send(&self, intent: InterbankIntent) -> Result<InterbankAcceptance, RemoteError>;
}
