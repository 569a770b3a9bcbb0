use crate::domain::{entities::Account, error::AccountError, repository::AccountRepository};
use std::sync::Arc;

/// Reads an individual account's current balance. Read-committed is
/// acceptable here; this path takes no lock.
#[derive(Clone)]
pub struct GetBalanceUseCase {
    account_repo: Arc<dyn AccountRepository>,
}

impl GetBalanceUseCase {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    #[tracing::instrument(name = "GetBalanceUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: &str) -> Result<Account, AccountError> {
        self.account_repo
            .find(user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockAccountRepository;

    #[tokio::test]
    async fn not_found_when_account_is_missing() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_find().times(1).returning(|_| Ok(None));

        let use_case = GetBalanceUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute("ghost").await;

        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }
}
