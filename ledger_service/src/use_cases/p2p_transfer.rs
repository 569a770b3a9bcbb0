use crate::domain::entities::{Transaction, TransactionStatus, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::gateways::{BalanceGateway, RecipientDirectoryGateway, RemoteError};
use crate::domain::repository::EventStore;
use crate::use_cases::idempotency::{IdempotencyPreamble, PreambleOutcome};
use crate::use_cases::status::classify_ba_error;
use common::{Money, WalletRef};
use std::sync::Arc;
use uuid::Uuid;

/// Peer-to-peer transfer: individual -> individual, recipient addressed by
/// phone number. The only saga with a compensation path, since it is the
/// only one that debits one account and then credits a second one
/// (SPEC_FULL.md §4.1.3).
pub struct P2pTransferUseCase {
    event_store: Arc<dyn EventStore>,
    balance_gateway: Arc<dyn BalanceGateway>,
    recipient_directory: Arc<dyn RecipientDirectoryGateway>,
}

impl P2pTransferUseCase {
    pub fn new(
        event_store: Arc<dyn EventStore>,
        balance_gateway: Arc<dyn BalanceGateway>,
        recipient_directory: Arc<dyn RecipientDirectoryGateway>,
    ) -> Self {
        Self {
            event_store,
            balance_gateway,
            recipient_directory,
        }
    }

    async fn settle(&self, id: Uuid, status: TransactionStatus) -> Result<(), LedgerError> {
        self.event_store.update_status(id, status, None).await
    }

    #[tracing::instrument(name = "P2pTransferUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        idempotency_key: Uuid,
        sender_id: String,
        destination_phone: String,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let preamble = IdempotencyPreamble::new(self.event_store.clone());
        let sender_for_pending = sender_id.clone();
        let phone_for_pending = destination_phone.clone();
        let pending = match preamble
            .check_or_begin(idempotency_key, move || {
                Transaction::new_pending(
                    sender_for_pending.clone(),
                    WalletRef::individual(sender_for_pending.clone()),
                    WalletRef::individual(phone_for_pending),
                    TransactionType::P2pSent,
                    amount,
                    "USD".to_string(),
                )
            })
            .await?
        {
            PreambleOutcome::AlreadyHandled(tx) => return Ok(*tx),
            PreambleOutcome::New(tx) => *tx,
        };

        // Step 1: resolve the recipient. Any failure here needs only the
        // terminal status update already described by the common preamble's
        // contract — no BA call has happened yet, so there is nothing to
        // compensate.
        let recipient_id = match self
            .recipient_directory
            .lookup_by_phone(&destination_phone)
            .await
        {
            Ok(id) => id,
            Err(RemoteError::NotFound) => {
                self.settle(pending.id, TransactionStatus::FailedUnknown).await?;
                return Err(LedgerError::RecipientNotFound);
            }
            Err(other) => {
                tracing::warn!(error = %other, "recipient directory lookup failed");
                self.settle(pending.id, TransactionStatus::FailedNetwork).await?;
                return Err(LedgerError::Terminal(Box::new(
                    pending.with_status(TransactionStatus::FailedNetwork),
                )));
            }
        };

        if recipient_id == sender_id {
            self.settle(pending.id, TransactionStatus::FailedUnknown).await?;
            return Err(LedgerError::SelfTransfer);
        }

        // Step 2: check funds (read-only, no compensation needed on failure).
        if let Err(e) = self.balance_gateway.check_funds(&sender_id, amount).await {
            let status = classify_ba_error(&e);
            self.settle(pending.id, status.clone()).await?;
            return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
        }

        // Step 3: debit the sender under BA's row lock.
        if let Err(e) = self.balance_gateway.debit(&sender_id, amount).await {
            let status = classify_ba_error(&e);
            self.settle(pending.id, status.clone()).await?;
            return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
        }

        // Step 4: credit the recipient. Failure here means the sender's
        // money has already left their account, so it must be compensated.
        match self.balance_gateway.credit(&recipient_id, amount).await {
            Ok(()) => {
                let incoming = Transaction::new_pending(
                    recipient_id.clone(),
                    WalletRef::individual(sender_id.clone()),
                    WalletRef::individual(recipient_id),
                    TransactionType::P2pReceived,
                    amount,
                    pending.currency.clone(),
                )
                .with_status(TransactionStatus::Completed);

                self.event_store.save_new(&incoming).await?;
                self.settle(pending.id, TransactionStatus::Completed).await?;
                self.event_store
                    .bind_idempotency_key(idempotency_key, pending.id)
                    .await?;
                Ok(pending.with_status(TransactionStatus::Completed))
            }
            Err(e) => {
                let base_failure = classify_ba_error(&e);
                tracing::warn!(error = %e, "p2p credit to recipient failed, reverting sender debit");

                match self.balance_gateway.credit(&sender_id, amount).await {
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
                            "p2p compensation credit failed, funds are stranded, operator attention required"
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
    use crate::domain::gateways::{MockBalanceGateway, MockRecipientDirectoryGateway};
    use crate::domain::repository::MockEventStore;
    use rust_decimal::Decimal;

    fn amount() -> Money {
        Money::positive(Decimal::new(5000, 2)).unwrap()
    }

    fn use_case(
        store: MockEventStore,
        balance: MockBalanceGateway,
        rd: MockRecipientDirectoryGateway,
    ) -> P2pTransferUseCase {
        P2pTransferUseCase::new(Arc::new(store), Arc::new(balance), Arc::new(rd))
    }

    #[tokio::test]
    async fn completes_a_transfer_between_two_distinct_users() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(2).returning(|_| Ok(()));
        store.expect_update_status().returning(|_, _, _| Ok(()));
        store.expect_bind_idempotency_key().returning(|_, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Ok("user-2".to_string()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));
        balance.expect_credit().times(1).returning(|_, _| Ok(()));

        let uc = use_case(store, balance, rd);
        let tx = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn rejects_transfers_to_self() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Ok("user-1".to_string()));

        let balance = MockBalanceGateway::new(); // no calls expected

        let uc = use_case(store, balance, rd);
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await;

        assert!(matches!(result, Err(LedgerError::SelfTransfer)));
    }

    #[tokio::test]
    async fn reports_unknown_recipient() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Err(RemoteError::NotFound));

        let balance = MockBalanceGateway::new();

        let uc = use_case(store, balance, rd);
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await;

        assert!(matches!(result, Err(LedgerError::RecipientNotFound)));
    }

    #[tokio::test]
    async fn insufficient_funds_stops_before_any_debit() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Ok("user-2".to_string()));

        let mut balance = MockBalanceGateway::new();
        balance
            .expect_check_funds()
            .returning(|_, _| Err(RemoteError::InsufficientFunds));

        let uc = use_case(store, balance, rd);
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => assert_eq!(tx.status, TransactionStatus::FailedFunds),
            other => panic!("expected Terminal(FailedFunds), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reverts_the_sender_debit_when_the_recipient_credit_fails() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Ok("user-2".to_string()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));
        balance
            .expect_credit()
            .times(1)
            .returning(|_, _| Err(RemoteError::NotFound));
        balance
            .expect_credit()
            .times(1)
            .returning(|_, _| Ok(())); // compensation credit back to sender

        let uc = use_case(store, balance, rd);
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => assert_eq!(
                tx.status,
                TransactionStatus::FailedAccount.reverted()
            ),
            other => panic!("expected Terminal(FAILED_ACCOUNT_REVERTED), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn records_revert_failed_when_the_compensation_credit_also_fails() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut rd = MockRecipientDirectoryGateway::new();
        rd.expect_lookup_by_phone()
            .returning(|_| Ok("user-2".to_string()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));
        balance
            .expect_credit()
            .times(2)
            .returning(|_, _| Err(RemoteError::Network("timeout".to_string())));

        let uc = use_case(store, balance, rd);
        let result = uc
            .execute(Uuid::new_v4(), "user-1".to_string(), "+15550001".to_string(), amount())
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => assert_eq!(
                tx.status,
                TransactionStatus::FailedNetwork.revert_failed()
            ),
            other => panic!("expected Terminal(FAILED_NETWORK_REVERT_FAILED), got {other:?}"),
        }
    }
}
