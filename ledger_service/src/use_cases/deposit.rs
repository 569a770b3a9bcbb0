use crate::domain::entities::{Transaction, TransactionStatus, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::gateways::BalanceGateway;
use crate::domain::repository::EventStore;
use crate::use_cases::idempotency::{IdempotencyPreamble, PreambleOutcome};
use common::{Money, WalletRef};
use std::sync::Arc;
use uuid::Uuid;

/// Deposit: external -> individual. The simplest saga in the system —
/// a single collaborator call, no compensation, because nothing precedes it
/// (SPEC_FULL.md §4.1.2).
pub struct DepositUseCase {
    event_store: Arc<dyn EventStore>,
    balance_gateway: Arc<dyn BalanceGateway>,
}

impl DepositUseCase {
    pub fn new(event_store: Arc<dyn EventStore>, balance_gateway: Arc<dyn BalanceGateway>) -> Self {
        Self {
            event_store,
            balance_gateway,
        }
    }

    #[tracing::instrument(name = "DepositUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        idempotency_key: Uuid,
        user_id: String,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let preamble = IdempotencyPreamble::new(self.event_store.clone());
        let user_id_for_pending = user_id.clone();
        let pending = match preamble
            .check_or_begin(idempotency_key, move || {
                Transaction::new_pending(
                    user_id_for_pending.clone(),
                    WalletRef::external(),
                    WalletRef::individual(user_id_for_pending),
                    TransactionType::Deposit,
                    amount,
                    "USD".to_string(),
                )
            })
            .await?
        {
            PreambleOutcome::AlreadyHandled(tx) => return Ok(*tx),
            PreambleOutcome::New(tx) => *tx,
        };

        match self.balance_gateway.credit(&user_id, amount).await {
            Ok(()) => {
                self.event_store
                    .update_status(pending.id, TransactionStatus::Completed, None)
                    .await?;
                self.event_store
                    .bind_idempotency_key(idempotency_key, pending.id)
                    .await?;
                Ok(pending.with_status(TransactionStatus::Completed))
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "deposit credit call failed");
                self.event_store
                    .update_status(pending.id, TransactionStatus::FailedBalanceSvc, None)
                    .await?;
                Err(LedgerError::Terminal(Box::new(
                    pending.with_status(TransactionStatus::FailedBalanceSvc),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateways::MockBalanceGateway;
    use crate::domain::repository::MockEventStore;
    use rust_decimal::Decimal;

    fn amount() -> Money {
        Money::positive(Decimal::new(15075, 2)).unwrap()
    }

    #[tokio::test]
    async fn completes_on_successful_credit() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().returning(|_| Ok(()));
        store.expect_update_status().returning(|_, _, _| Ok(()));
        store.expect_bind_idempotency_key().returning(|_, _| Ok(()));

        let mut gateway = MockBalanceGateway::new();
        gateway.expect_credit().times(1).returning(|_, _| Ok(()));

        let use_case = DepositUseCase::new(Arc::new(store), Arc::new(gateway));
        let tx = use_case
            .execute(Uuid::new_v4(), "user-1".to_string(), amount())
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.amount, amount());
    }

    #[tokio::test]
    async fn marks_failed_balance_svc_when_ba_rejects() {
        use crate::domain::gateways::RemoteError;

        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().returning(|_| Ok(()));
        store.expect_update_status().returning(|_, _, _| Ok(()));

        let mut gateway = MockBalanceGateway::new();
        gateway
            .expect_credit()
            .times(1)
            .returning(|_, _| Err(RemoteError::NotFound));

        let use_case = DepositUseCase::new(Arc::new(store), Arc::new(gateway));
        let result = use_case
            .execute(Uuid::new_v4(), "ghost".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => {
                assert_eq!(tx.status, TransactionStatus::FailedBalanceSvc)
            }
            other => panic!("expected Terminal(FailedBalanceSvc), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn replays_the_cached_transaction_on_a_repeated_key() {
        let mut store = MockEventStore::new();
        let completed =
            Transaction::new_pending(
                "user-1".to_string(),
                WalletRef::external(),
                WalletRef::individual("user-1"),
                TransactionType::Deposit,
                amount(),
                "USD".to_string(),
            )
            .with_status(TransactionStatus::Completed);
        let completed_id = completed.id;

        store
            .expect_find_idempotency_binding()
            .returning(move |_| Ok(Some(completed_id)));
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));

        let gateway = MockBalanceGateway::new(); // expects no calls

        let use_case = DepositUseCase::new(Arc::new(store), Arc::new(gateway));
        let tx = use_case
            .execute(Uuid::new_v4(), "user-1".to_string(), amount())
            .await
            .unwrap();

        assert_eq!(tx.id, completed_id);
        assert_eq!(tx.status, TransactionStatus::Completed);
    }
}
