use common::Money;
use ledger_service::domain::entities::TransactionStatus;
use ledger_service::infrastructure::gateways::fakes::{
    FakeBalanceGateway, FakeInterbankGateway, FakeRecipientDirectoryGateway,
};
use ledger_service::infrastructure::persistence::in_memory_event_store::InMemoryEventStore;
use ledger_service::use_cases::contribution::ContributionUseCase;
use ledger_service::use_cases::deposit::DepositUseCase;
use ledger_service::use_cases::p2p_transfer::P2pTransferUseCase;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

fn amount(cents: i64) -> Money {
    Money::positive(Decimal::new(cents, 2)).unwrap()
}

#[tokio::test]
async fn deposit_then_history_reflects_the_credited_amount() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let balance = Arc::new(FakeBalanceGateway::new());
    balance.seed("user-1", Money::zero());

    let deposit = DepositUseCase::new(event_store.clone(), balance.clone());
    let tx = deposit
        .execute(Uuid::new_v4(), "user-1".to_string(), amount(10000))
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Completed);

    let history = event_store.find_by_user("user-1", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, tx.id);
}

#[tokio::test]
async fn replaying_a_deposit_with_the_same_key_does_not_double_credit() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let balance = Arc::new(FakeBalanceGateway::new());
    balance.seed("user-1", Money::zero());

    let deposit = DepositUseCase::new(event_store.clone(), balance.clone());
    let key = Uuid::new_v4();

    let first = deposit
        .execute(key, "user-1".to_string(), amount(5000))
        .await
        .unwrap();
    let second = deposit
        .execute(key, "user-1".to_string(), amount(5000))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);

    let history = event_store.find_by_user("user-1", 10).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn a_p2p_transfer_moves_funds_between_two_accounts_and_writes_both_sides() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let balance = Arc::new(FakeBalanceGateway::new());
    balance.seed("sender", amount(20000));
    balance.seed("recipient", Money::zero());

    let rd = Arc::new(FakeRecipientDirectoryGateway::new());
    rd.register("+15551234", "recipient");

    let p2p = P2pTransferUseCase::new(event_store.clone(), balance.clone(), rd.clone());
    let tx = p2p
        .execute(
            Uuid::new_v4(),
            "sender".to_string(),
            "+15551234".to_string(),
            amount(7500),
        )
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Completed);

    let sender_history = event_store.find_by_user("sender", 10).await.unwrap();
    let recipient_history = event_store.find_by_user("recipient", 10).await.unwrap();
    assert_eq!(sender_history.len(), 1);
    assert_eq!(recipient_history.len(), 1);
}

#[tokio::test]
async fn a_contribution_debits_the_member_and_credits_the_group() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let balance = Arc::new(FakeBalanceGateway::new());
    balance.seed("member-1", amount(15000));
    balance.seed_group("group-1", Money::zero());

    let contribution = ContributionUseCase::new(event_store.clone(), balance.clone());
    let tx = contribution
        .execute(
            Uuid::new_v4(),
            "member-1".to_string(),
            "group-1".to_string(),
            amount(3000),
        )
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Completed);
}

#[tokio::test]
async fn interbank_transfer_runs_end_to_end_against_the_fake_gateway() {
    use ledger_service::use_cases::interbank_transfer::InterbankTransferUseCase;

    let event_store = Arc::new(InMemoryEventStore::new());
    let balance = Arc::new(FakeBalanceGateway::new());
    balance.seed("sender", amount(20000));
    let ig = Arc::new(FakeInterbankGateway::new());

    let uc = InterbankTransferUseCase::new(event_store.clone(), balance.clone(), ig.clone());
    let tx = uc
        .execute(
            Uuid::new_v4(),
            "sender".to_string(),
            "BANCO-UNO".to_string(),
            "+15559999".to_string(),
            amount(5000),
            "groceries".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Completed);
}
