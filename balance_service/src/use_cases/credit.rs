use crate::domain::{entities::Account, error::AccountError, repository::AccountRepository};
use common::Money;
use std::sync::Arc;

/// Credits an individual account under a row-level exclusive lock.
pub struct CreditUseCase {
    account_repo: Arc<dyn AccountRepository>,
}

impl CreditUseCase {
    pub fn new(account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { account_repo }
    }

    #[tracing::instrument(name = "CreditUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: &str, amount: Money) -> Result<Account, AccountError> {
        self.account_repo.credit(user_id, amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockAccountRepository;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn credits_an_existing_account() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_credit().times(1).returning(|user_id, amount| {
            Ok(Account {
                user_id: user_id.to_string(),
                balance: amount,
                currency: "USD".to_string(),
                created_at: Utc::now(),
            })
        });

        let use_case = CreditUseCase::new(Arc::new(mock_repo));
        let amount = Money::positive(Decimal::new(15075, 2)).unwrap();
        let result = use_case.execute("user-1", amount).await.unwrap();

        assert_eq!(result.balance, amount);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo
            .expect_credit()
            .times(1)
            .returning(|user_id, _| Err(AccountError::NotFound(user_id.to_string())));

        let use_case = CreditUseCase::new(Arc::new(mock_repo));
        let amount = Money::positive(Decimal::new(100, 2)).unwrap();
        let result = use_case.execute("ghost", amount).await;

        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }
}
