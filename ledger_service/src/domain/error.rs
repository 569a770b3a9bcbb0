use crate::domain::entities::Transaction;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the Ledger Orchestrator's use cases.
///
/// `Terminal` is the common case for a saga that ran to a failed-but-settled
/// outcome (FAILED_FUNDS, FAILED_REMOTE_*, ...): the transaction was
/// persisted with its terminal status, and the API layer derives the HTTP
/// status code from that status rather than from a separate error code, per
/// "the status field is the single source of truth" (SPEC_FULL.md §7).
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("missing or malformed Idempotency-Key header")]
    InvalidIdempotencyKey,

    #[error("amount must be strictly positive")]
    InvalidAmount,

    #[error("cannot transfer to yourself")]
    SelfTransfer,

    #[error("unsupported destination bank: {0}")]
    UnsupportedBank(String),

    #[error("recipient phone number not found")]
    RecipientNotFound,

    #[error("idempotency key {0} is bound to a transaction that no longer exists")]
    IdempotencyInconsistency(Uuid),

    #[error("transaction settled with terminal status {}", .0.status)]
    Terminal(Box<Transaction>),

    #[error("event store error: {0}")]
    EventStoreError(String),

    #[error("internal error: {0}")]
    Internal(String),
}
