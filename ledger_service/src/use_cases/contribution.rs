use crate::domain::entities::{Transaction, TransactionStatus, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::gateways::BalanceGateway;
use crate::domain::repository::EventStore;
use crate::use_cases::idempotency::{IdempotencyPreamble, PreambleOutcome};
use crate::use_cases::status::classify_ba_error;
use common::{Money, WalletRef};
use std::sync::Arc;
use uuid::Uuid;

/// Contribution: individual -> group. Debits the contributor, then credits
/// the group account; a failed group credit is compensated by crediting the
/// contributor back (SPEC_FULL.md §4.1.4).
pub struct ContributionUseCase {
    event_store: Arc<dyn EventStore>,
    balance_gateway: Arc<dyn BalanceGateway>,
}

impl ContributionUseCase {
    pub fn new(event_store: Arc<dyn EventStore>, balance_gateway: Arc<dyn BalanceGateway>) -> Self {
        Self {
            event_store,
            balance_gateway,
        }
    }

    async fn settle(&self, id: Uuid, status: TransactionStatus) -> Result<(), LedgerError> {
        self.event_store.update_status(id, status, None).await
    }

    #[tracing::instrument(name = "ContributionUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        idempotency_key: Uuid,
        user_id: String,
        group_id: String,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let preamble = IdempotencyPreamble::new(self.event_store.clone());
        let user_for_pending = user_id.clone();
        let group_for_pending = group_id.clone();
        let pending = match preamble
            .check_or_begin(idempotency_key, move || {
                Transaction::new_pending(
                    user_for_pending.clone(),
                    WalletRef::individual(user_for_pending.clone()),
                    WalletRef::group(group_for_pending),
                    TransactionType::Contribution,
                    amount,
                    "USD".to_string(),
                )
            })
            .await?
        {
            PreambleOutcome::AlreadyHandled(tx) => return Ok(*tx),
            PreambleOutcome::New(tx) => *tx,
        };

        if let Err(e) = self.balance_gateway.check_funds(&user_id, amount).await {
            let status = classify_ba_error(&e);
            self.settle(pending.id, status.clone()).await?;
            return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
        }

        if let Err(e) = self.balance_gateway.debit(&user_id, amount).await {
            let status = classify_ba_error(&e);
            self.settle(pending.id, status.clone()).await?;
            return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
        }

        match self.balance_gateway.credit_group(&group_id, amount).await {
            Ok(()) => {
                self.settle(pending.id, TransactionStatus::Completed).await?;
                self.event_store
                    .bind_idempotency_key(idempotency_key, pending.id)
                    .await?;
                Ok(pending.with_status(TransactionStatus::Completed))
            }
            Err(e) => {
                let base_failure = classify_ba_error(&e);
                tracing::warn!(error = %e, "group credit failed, reverting contributor debit");

                match self.balance_gateway.credit(&user_id, amount).await {
                    Ok(()) => {
                        let status = base_failure.reverted();
                        self.settle(pending.id, status.clone()).await?;
                        Err(LedgerError::Terminal(Box::new(pending.with_status(status))))
                    }
                    Err(compensation_err) => {
                        let status = base_failure.revert_failed();
                        tracing::error!(
                            error = %compensation_err,
                            transaction_id = %pending.id,
                            "contribution compensation credit failed, funds are stranded, operator attention required"
                        );
                        self.settle(pending.id, status.clone()).await?;
                        Err(LedgerError::Terminal(Box::new(pending.with_status(status))))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateways::{MockBalanceGateway, RemoteError};
    use crate::domain::repository::MockEventStore;
    use rust_decimal::Decimal;

    fn amount() -> Money {
        Money::positive(Decimal::new(2500, 2)).unwrap()
    }

    #[tokio::test]
    async fn completes_when_group_credit_succeeds() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().returning(|_| Ok(()));
        store.expect_update_status().returning(|_, _, _| Ok(()));
        store.expect_bind_idempotency_key().returning(|_, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));
        balance.expect_credit_group().times(1).returning(|_, _| Ok(()));

        let uc = ContributionUseCase::new(Arc::new(store), Arc::new(balance));
        let tx = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "group-1".to_string(), amount())
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn insufficient_funds_never_touches_the_group() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance
            .expect_check_funds()
            .returning(|_, _| Err(RemoteError::InsufficientFunds));

        let uc = ContributionUseCase::new(Arc::new(store), Arc::new(balance));
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "group-1".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => assert_eq!(tx.status, TransactionStatus::FailedFunds),
            other => panic!("expected Terminal(FailedFunds), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reverts_the_debit_when_the_group_credit_fails() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));
        balance
            .expect_credit_group()
            .times(1)
            .returning(|_, _| Err(RemoteError::NotFound));
        balance.expect_credit().times(1).returning(|_, _| Ok(()));

        let uc = ContributionUseCase::new(Arc::new(store), Arc::new(balance));
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "group-1".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => {
                assert_eq!(tx.status, TransactionStatus::FailedAccount.reverted())
            }
            other => panic!("expected Terminal(FAILED_ACCOUNT_REVERTED), got {other:?}"),
        }
    }
}
