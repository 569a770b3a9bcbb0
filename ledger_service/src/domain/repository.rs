use crate::domain::entities::{Transaction, TransactionStatus};
use crate::domain::error::LedgerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Port to the wide-column Event Store. Method boundaries mirror
/// SPEC_FULL.md §4.3: `save_new` is the only operation that must be atomic
/// across the by-id and by-user tables (the store's batch-write primitive),
/// used both for the initial PENDING write and for the paired P2P credit
/// event; everything else is a single-row operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts a brand-new transaction into both the by-id and by-user
    /// tables as one atomic batch.
    async fn save_new(&self, transaction: &Transaction) -> Result<(), LedgerError>;

    /// Updates an existing transaction's status (and optionally its
    /// metadata) in place. Not required to be atomic across both tables.
    async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        metadata: Option<String>,
    ) -> Result<(), LedgerError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, LedgerError>;

    async fn find_by_user(&self, user_id: &str, limit: i32) -> Result<Vec<Transaction>, LedgerError>;

    async fn find_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Binds an idempotency key to the transaction id it produced. Per
    /// SPEC_FULL.md §3, insertion is contingent on the transaction having
    /// reached a terminal status; callers must only call this after the
    /// saga has settled.
    async fn bind_idempotency_key(&self, key: Uuid, transaction_id: Uuid) -> Result<(), LedgerError>;

    async fn find_idempotency_binding(&self, key: Uuid) -> Result<Option<Uuid>, LedgerError>;
}
