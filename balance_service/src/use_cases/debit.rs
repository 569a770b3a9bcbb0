use crate::domain::{entities::Account, error::AccountError, repository::AccountRepository};
use common::Money;
use std::sync::Arc;

/// Debits an individual account under a row-level exclusive lock. The
/// repository re-checks sufficiency inside the locked transaction; a
/// passing advisory [`crate::use_cases::check_funds::CheckFundsUseCase`]
/// call beforehand does not guarantee this succeeds under concurrent load.
pub struct DebitUseCase {
    account_repo: Arc<dyn AccountRepository>,
}

impl DebitUseCase {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    #[tracing::instrument(name = "DebitUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: &str, amount: Money) -> Result<Account, AccountError> {
        self.account_repo.debit(user_id, amount).await
    }
}
