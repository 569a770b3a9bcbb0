use crate::domain::{
    entities::GroupAccount, error::AccountError, repository::GroupAccountRepository,
};
use std::sync::Arc;

/// Creates a new group account ("BDG") for a group id.
pub struct CreateGroupAccountUseCase {
    group_account_repo: Arc<dyn GroupAccountRepository>,
}

impl CreateGroupAccountUseCase {
    pub fn new(group_account_repo: Arc<dyn GroupAccountRepository>) -> Self {
        Self { group_account_repo }
    }

    pub async fn execute(
        &self,
        group_id: &str,
        currency: &str,
    ) -> Result<GroupAccount, AccountError> {
        self.group_account_repo.create(group_id, currency).await
    }
}
