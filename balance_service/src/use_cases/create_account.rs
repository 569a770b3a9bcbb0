use crate::domain::{entities::Account, error::AccountError, repository::AccountRepository};
use std::sync::Arc;

/// Creates a new individual account ("BDI") for a user id.
pub struct CreateAccountUseCase {
    account_repo: Arc<dyn AccountRepository>,
}

impl CreateAccountUseCase {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, user_id: &str, currency: &str) -> Result<Account, AccountError> {
        self.account_repo.create(user_id, currency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockAccountRepository;
    use chrono::Utc;
    use common::Money;

    #[tokio::test]
    async fn creates_a_fresh_account() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_create().times(1).returning(|user_id, currency| {
            Ok(Account {
                user_id: user_id.to_string(),
                balance: Money::zero(),
                currency: currency.to_string(),
                created_at: Utc::now(),
            })
        });

        let use_case = CreateAccountUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute("user-1", "USD").await.unwrap();

        assert_eq!(result.user_id, "user-1");
        assert_eq!(result.balance, Money::zero());
    }

    #[tokio::test]
    async fn surfaces_duplicate_as_already_exists() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|user_id, _| Err(AccountError::AlreadyExists(user_id.to_string())));

        let use_case = CreateAccountUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute("user-1", "USD").await;

        assert!(matches!(result, Err(AccountError::AlreadyExists(id)) if id == "user-1"));
    }
}
