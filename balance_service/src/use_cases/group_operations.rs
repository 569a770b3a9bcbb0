use crate::domain::{
    entities::GroupAccount, error::AccountError, repository::GroupAccountRepository,
};
use common::Money;
use std::sync::Arc;

/// Reads, checks, credits, and debits a group account. Kept as one file
/// because each operation is a one-line delegation to the repository port;
/// splitting them the way the individual-account use cases are split would
/// be pure ceremony for no behavioral difference.
pub struct GroupAccountUseCases {
    group_account_repo: Arc<dyn GroupAccountRepository>,
}

impl GroupAccountUseCases {
    pub fn new(group_account_repo: Arc<dyn GroupAccountRepository>) -> Self {
        Self { group_account_repo }
    }

    pub async fn get_balance(&self, group_id: &str) -> Result<GroupAccount, AccountError> {
        self.group_account_repo
            .find(group_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(group_id.to_string()))
    }

    pub async fn check_funds(&self, group_id: &str, amount: Money) -> Result<(), AccountError> {
        self.group_account_repo.check_funds(group_id, amount).await
    }

    pub async fn credit(
        &self,
        group_id: &str,
        amount: Money,
    ) -> Result<GroupAccount, AccountError> {
        self.group_account_repo.credit(group_id, amount).await
    }

    pub async fn debit(&self, group_id: &str, amount: Money) -> Result<GroupAccount, AccountError> {
        self.group_account_repo.debit(group_id, amount).await
    }
}
