use crate::domain::entities::Transaction;
use crate::domain::error::LedgerError;
use crate::domain::repository::EventStore;
use std::sync::Arc;
use uuid::Uuid;

/// The common preamble every Ledger Orchestrator operation runs before its
/// saga body, per SPEC_FULL.md §4.1.1.
pub struct IdempotencyPreamble {
    event_store: Arc<dyn EventStore>,
}

/// What the preamble decided: either the request was seen before and the
/// saga body must not run again, or it is genuinely new and a PENDING row
/// has just been durably recorded.
pub enum PreambleOutcome {
    AlreadyHandled(Box<Transaction>),
    New(Box<Transaction>),
}

impl IdempotencyPreamble {
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self { event_store }
    }

    /// `build_pending` is called only on a cache miss, since constructing a
    /// fresh `Transaction` differs per saga (source/destination/type vary).
    pub async fn check_or_begin(
        &self,
        idempotency_key: Uuid,
        build_pending: impl FnOnce() -> Transaction,
    ) -> Result<PreambleOutcome, LedgerError> {
        if let Some(transaction_id) = self
            .event_store
            .find_idempotency_binding(idempotency_key)
            .await?
        {
            let transaction = self
                .event_store
                .find_by_id(transaction_id)
                .await?
                .ok_or(LedgerError::IdempotencyInconsistency(idempotency_key))?;
            return Ok(PreambleOutcome::AlreadyHandled(Box::new(transaction)));
        }

        let pending = build_pending();
        self.event_store.save_new(&pending).await?;
        Ok(PreambleOutcome::New(Box::new(pending)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{TransactionStatus, TransactionType};
    use crate::domain::repository::MockEventStore;
    use common::{Money, WalletRef};

    fn sample_pending() -> Transaction {
        Transaction::new_pending(
            "user-1".to_string(),
            WalletRef::external(),
            WalletRef::individual("user-1"),
            TransactionType::Deposit,
            Money::from_existing(rust_decimal::Decimal::new(10000, 2)),
            "USD".to_string(),
        )
    }

    #[tokio::test]
    async fn returns_existing_transaction_on_a_replayed_key() {
        let mut store = MockEventStore::new();
        let existing = sample_pending().with_status(TransactionStatus::Completed);
        let existing_id = existing.id;

        store
            .expect_find_idempotency_binding()
            .times(1)
            .returning(move |_| Ok(Some(existing_id)));
        store
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let preamble = IdempotencyPreamble::new(Arc::new(store));
        let outcome = preamble
            .check_or_begin(Uuid::new_v4(), sample_pending)
            .await
            .unwrap();

        match outcome {
            PreambleOutcome::AlreadyHandled(tx) => assert_eq!(tx.id, existing_id),
            PreambleOutcome::New(_) => panic!("expected AlreadyHandled"),
        }
    }

    #[tokio::test]
    async fn idempotency_key_without_a_matching_transaction_is_an_inconsistency() {
        let mut store = MockEventStore::new();
        let phantom_id = Uuid::new_v4();

        store
            .expect_find_idempotency_binding()
            .times(1)
            .returning(move |_| Ok(Some(phantom_id)));
        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let preamble = IdempotencyPreamble::new(Arc::new(store));
        let key = Uuid::new_v4();
        let result = preamble.check_or_begin(key, sample_pending).await;

        assert!(matches!(result, Err(LedgerError::IdempotencyInconsistency(k)) if k == key));
    }

    #[tokio::test]
    async fn writes_a_fresh_pending_row_on_a_miss() {
        let mut store = MockEventStore::new();
        store
            .expect_find_idempotency_binding()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));

        let preamble = IdempotencyPreamble::new(Arc::new(store));
        let outcome = preamble
            .check_or_begin(Uuid::new_v4(), sample_pending)
            .await
            .unwrap();

        match outcome {
            PreambleOutcome::New(tx) => assert_eq!(tx.status, TransactionStatus::Pending),
            PreambleOutcome::AlreadyHandled(_) => panic!("expected New"),
        }
    }
}
