use crate::domain::{error::AccountError, repository::AccountRepository};
use common::Money;
use std::sync::Arc;

/// Non-locking, advisory funds check. The authoritative check happens again
/// inside `debit`'s locked transaction; this exists so callers (the Ledger
/// Orchestrator) can fail fast before committing to a saga.
pub struct CheckFundsUseCase {
    account_repo: Arc<dyn AccountRepository>,
}

impl CheckFundsUseCase {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, user_id: &str, amount: Money) -> Result<(), AccountError> {
        self.account_repo.check_funds(user_id, amount).await
    }
}
