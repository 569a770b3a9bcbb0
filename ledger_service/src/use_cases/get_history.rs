use crate::domain::entities::Transaction;
use crate::domain::error::LedgerError;
use crate::domain::repository::EventStore;
use std::sync::Arc;

const MAX_HISTORY_LIMIT: i32 = 50;

/// Reads a user's transaction history from the by-user clustering, newest
/// first, per SPEC_FULL.md §4.1.7. The store is expected to already return
/// rows in descending `created_at` order; this use case only enforces the
/// page-size ceiling.
pub struct GetHistoryUseCase {
    event_store: Arc<dyn EventStore>,
}

impl GetHistoryUseCase {
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self { event_store }
    }

    #[tracing::instrument(name = "GetHistoryUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: &str, limit: i32) -> Result<Vec<Transaction>, LedgerError> {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        self.event_store.find_by_user(user_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TransactionType;
    use crate::domain::repository::MockEventStore;
    use common::{Money, WalletRef};
    use rust_decimal::Decimal;

    fn sample() -> Transaction {
        Transaction::new_pending(
            "user-1".to_string(),
            WalletRef::external(),
            WalletRef::individual("user-1"),
            TransactionType::Deposit,
            Money::positive(Decimal::new(100, 2)).unwrap(),
            "USD".to_string(),
        )
    }

    #[tokio::test]
    async fn caps_the_requested_limit_at_fifty() {
        let mut store = MockEventStore::new();
        store
            .expect_find_by_user()
            .withf(|_, limit| *limit == 50)
            .returning(|_, _| Ok(vec![]));

        let uc = GetHistoryUseCase::new(Arc::new(store));
        uc.execute("user-1", 500).await.unwrap();
    }

    #[tokio::test]
    async fn returns_what_the_store_gives_back() {
        let mut store = MockEventStore::new();
        let tx = sample();
        let tx_clone = tx.clone();
        store
            .expect_find_by_user()
            .returning(move |_, _| Ok(vec![tx_clone.clone()]));

        let uc = GetHistoryUseCase::new(Arc::new(store));
        let history = uc.execute("user-1", 10).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, tx.id);
    }
}
