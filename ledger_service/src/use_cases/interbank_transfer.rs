use crate::domain::entities::{Transaction, TransactionStatus, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::gateways::{BalanceGateway, InterbankGateway, InterbankIntent, RemoteError};
use crate::domain::repository::EventStore;
use crate::use_cases::idempotency::{IdempotencyPreamble, PreambleOutcome};
use crate::use_cases::status::{classify_ba_error, classify_ig_error};
use common::{Money, WalletRef};
use std::sync::Arc;
use uuid::Uuid;

/// Banks the Interbank Gateway knows how to route to. Validated before any
/// collaborator is touched, since an unsupported bank is a pure input error
/// (SPEC_FULL.md §4.1.5).
const SUPPORTED_BANKS: &[&str] = &["BANCO-UNO", "BANCO-DOS", "BANCO-TRES"];

fn validate_bank(bank_code: &str) -> Result<(), LedgerError> {
    if SUPPORTED_BANKS.contains(&bank_code) {
        Ok(())
    } else {
        Err(LedgerError::UnsupportedBank(bank_code.to_string()))
    }
}

/// Interbank transfer: individual -> external bank account, via the
/// Interbank Gateway. The one saga where debiting the sender happens *after*
/// the external call succeeds, which makes a debit failure at that point a
/// dangerous, deliberately uncompensated state: the remote side already
/// accepted the money and telling it to reverse is itself a fallible network
/// call the contract does not ask us to make (SPEC_FULL.md §4.1.5, §7).
pub struct InterbankTransferUseCase {
    event_store: Arc<dyn EventStore>,
    balance_gateway: Arc<dyn BalanceGateway>,
    interbank_gateway: Arc<dyn InterbankGateway>,
}

impl InterbankTransferUseCase {
    pub fn new(
        event_store: Arc<dyn EventStore>,
        balance_gateway: Arc<dyn BalanceGateway>,
        interbank_gateway: Arc<dyn InterbankGateway>,
    ) -> Self {
        Self {
            event_store,
            balance_gateway,
            interbank_gateway,
        }
    }

    async fn settle(&self, id: Uuid, status: TransactionStatus) -> Result<(), LedgerError> {
        self.event_store.update_status(id, status, None).await
    }

    #[tracing::instrument(name = "InterbankTransferUseCase::execute", skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn execute(
        &self,
        idempotency_key: Uuid,
        sender_id: String,
        destination_bank: String,
        destination_phone: String,
        amount: Money,
        description: String,
    ) -> Result<Transaction, LedgerError> {
        validate_bank(&destination_bank)?;

        let preamble = IdempotencyPreamble::new(self.event_store.clone());
        let sender_for_pending = sender_id.clone();
        let bank_for_pending = destination_bank.clone();
        let pending = match preamble
            .check_or_begin(idempotency_key, move || {
                Transaction::new_pending(
                    sender_for_pending.clone(),
                    WalletRef::individual(sender_for_pending.clone()),
                    WalletRef::external_bank(bank_for_pending),
                    TransactionType::Transfer,
                    amount,
                    "USD".to_string(),
                )
            })
            .await?
        {
            PreambleOutcome::AlreadyHandled(tx) => return Ok(*tx),
            PreambleOutcome::New(tx) => *tx,
        };

        // Step 1: check funds. No money has moved anywhere yet.
        if let Err(e) = self.balance_gateway.check_funds(&sender_id, amount).await {
            let status = classify_ba_error(&e);
            self.settle(pending.id, status.clone()).await?;
            return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
        }

        // Step 2: ask the remote bank to accept the transfer.
        let intent = InterbankIntent {
            origin_bank: "PIXEL-MONEY".to_string(),
            origin_account_id: sender_id.clone(),
            destination_bank: destination_bank.clone(),
            destination_phone_number: destination_phone,
            amount,
            currency: pending.currency.clone(),
            transaction_id: pending.id,
            description,
        };

        let acceptance = match self.interbank_gateway.send(intent).await {
            Ok(acceptance) => acceptance,
            Err(e) => {
                let status = classify_ig_error(&e);
                self.settle(pending.id, status.clone()).await?;
                return Err(LedgerError::Terminal(Box::new(pending.with_status(status))));
            }
        };

        let metadata = format!(r#"{{"remote_tx_id":"{}"}}"#, acceptance.remote_tx_id);

        // Step 3: only now debit the sender. The remote bank has already
        // accepted the money, so a failure here is not compensated.
        match self.balance_gateway.debit(&sender_id, amount).await {
            Ok(()) => {
                self.event_store
                    .update_status(pending.id, TransactionStatus::Completed, Some(metadata.clone()))
                    .await?;
                self.event_store
                    .bind_idempotency_key(idempotency_key, pending.id)
                    .await?;
                Ok(pending
                    .with_metadata(metadata)
                    .with_status(TransactionStatus::Completed))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    transaction_id = %pending.id,
                    "debit after interbank confirmation failed, remote side already accepted the transfer, operator attention required"
                );
                self.settle(pending.id, TransactionStatus::FailedDebitPostConfirmation)
                    .await?;
                Err(LedgerError::Terminal(Box::new(
                    pending.with_status(TransactionStatus::FailedDebitPostConfirmation),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateways::{InterbankAcceptance, MockBalanceGateway, MockInterbankGateway};
    use crate::domain::repository::MockEventStore;
    use rust_decimal::Decimal;

    fn amount() -> Money {
        Money::positive(Decimal::new(10000, 2)).unwrap()
    }

    #[tokio::test]
    async fn rejects_unsupported_banks_before_touching_any_collaborator() {
        let store = MockEventStore::new(); // no calls expected
        let balance = MockBalanceGateway::new();
        let ig = MockInterbankGateway::new();

        let uc = InterbankTransferUseCase::new(Arc::new(store), Arc::new(balance), Arc::new(ig));
        let result = uc
            .execute(
                Uuid::new_v4(),
                "user-1".to_string(),
                "BANCO-FANTASMA".to_string(),
                "+15550001".to_string(),
                amount(),
                "rent".to_string(),
            )
            .await;

        assert!(matches!(result, Err(LedgerError::UnsupportedBank(bank)) if bank == "BANCO-FANTASMA"));
    }

    #[tokio::test]
    async fn completes_when_the_remote_bank_accepts_and_the_debit_succeeds() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().returning(|_| Ok(()));
        store.expect_update_status().returning(|_, _, _| Ok(()));
        store.expect_bind_idempotency_key().returning(|_, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance.expect_debit().times(1).returning(|_, _| Ok(()));

        let mut ig = MockInterbankGateway::new();
        ig.expect_send().times(1).returning(|_| {
            Ok(InterbankAcceptance {
                remote_tx_id: "remote-123".to_string(),
            })
        });

        let uc = InterbankTransferUseCase::new(Arc::new(store), Arc::new(balance), Arc::new(ig));
        let tx = uc
            .execute(
                Uuid::new_v4(),
                "user-1".to_string(),
                "BANCO-UNO".to_string(),
                "+15550001".to_string(),
                amount(),
                "rent".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn a_rejected_transfer_is_recorded_with_the_remote_status_code() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));

        let mut ig = MockInterbankGateway::new();
        ig.expect_send()
            .times(1)
            .returning(|_| Err(RemoteError::Rejected(422)));

        let uc = InterbankTransferUseCase::new(Arc::new(store), Arc::new(balance), Arc::new(ig));
        let result = uc
            .execute(
                Uuid::new_v4(),
                "user-1".to_string(),
                "BANCO-UNO".to_string(),
                "+15550001".to_string(),
                amount(),
                "rent".to_string(),
            )
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => {
                assert_eq!(tx.status, TransactionStatus::FailedRemote(422))
            }
            other => panic!("expected Terminal(FAILED_REMOTE_422), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_debit_failure_after_confirmation_is_never_compensated() {
        let mut store = MockEventStore::new();
        store.expect_find_idempotency_binding().returning(|_| Ok(None));
        store.expect_save_new().times(1).returning(|_| Ok(()));
        store.expect_update_status().times(1).returning(|_, _, _| Ok(()));

        let mut balance = MockBalanceGateway::new();
        balance.expect_check_funds().returning(|_, _| Ok(()));
        balance
            .expect_debit()
            .times(1)
            .returning(|_, _| Err(RemoteError::Network("timeout".to_string())));

        let mut ig = MockInterbankGateway::new();
        ig.expect_send().times(1).returning(|_| {
            Ok(InterbankAcceptance {
                remote_tx_id: "remote-123".to_string(),
            })
        });

        let uc = InterbankTransferUseCase::new(Arc::new(store), Arc::new(balance), Arc::new(ig));
        let result = uc
            .execute(
                Uuid::new_v4(),
                "user-1".to_string(),
                "BANCO-UNO".to_string(),
                "+15550001".to_string(),
                amount(),
                "rent".to_string(),
            )
            .await;

        match result {
            Err(LedgerError::Terminal(tx)) => {
                assert_eq!(tx.status, TransactionStatus::FailedDebitPostConfirmation)
            }
            other => panic!("expected Terminal(FailedDebitPostConfirmation), got {other:?}"),
        }
    }
}
