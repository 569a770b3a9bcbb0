use crate::domain::entities::{Transaction, TransactionStatus};
use crate::domain::error::LedgerError;
use crate::domain::repository::EventStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory `EventStore` for integration tests and local development
/// without a ScyllaDB cluster. Keeps a single `by_id` map and derives the
/// by-user ordering and pending scan from it at read time, rather than
/// maintaining the two tables' ScyllaDB split — acceptable here because
/// nothing about this fake is exercised for its storage-layout properties.
#[derive(Default)]
pub struct InMemoryEventStore {
    transactions: Mutex<HashMap<Uuid, Transaction>>,
    idempotency_keys: Mutex<HashMap<Uuid, Uuid>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save_new(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        metadata: Option<String>,
    ) -> Result<(), LedgerError> {
        let mut transactions = self.transactions.lock().unwrap();
        let tx = transactions
            .get_mut(&id)
            .ok_or_else(|| LedgerError::EventStoreError(format!("no transaction {id} to update")))?;
        tx.status = status;
        if let Some(metadata) = metadata {
            tx.metadata = metadata;
        }
        tx.updated_at = Utc::now();
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.transactions.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &str, limit: i32) -> Result<Vec<Transaction>, LedgerError> {
        let transactions = self.transactions.lock().unwrap();
        let mut matching: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn find_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .values()
            .filter(|tx| !tx.status.is_terminal() && tx.created_at < cutoff)
            .cloned()
            .collect())
    }

    async fn bind_idempotency_key(&self, key: Uuid, transaction_id: Uuid) -> Result<(), LedgerError> {
        self.idempotency_keys.lock().unwrap().insert(key, transaction_id);
        Ok(())
    }

    async fn find_idempotency_binding(&self, key: Uuid) -> Result<Option<Uuid>, LedgerError> {
        Ok(self.idempotency_keys.lock().unwrap().get(&key).copied())
    }
}
