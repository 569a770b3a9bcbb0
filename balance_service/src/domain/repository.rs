use crate::domain::entities::{Account, GroupAccount};
use crate::domain::error::AccountError;
use async_trait::async_trait;
use common::Money;

/// Port for the individual-account ledger ("BDI").
///
/// Every mutating method (`credit`, `debit`) is documented by the governing
/// contract to run as `begin -> SELECT ... FOR UPDATE -> compute -> UPDATE ->
/// commit`; implementations must hold the row-level exclusive lock for the
/// whole transaction, not just the final `UPDATE` statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, user_id: &str, currency: &str) -> Result<Account, AccountError>;
    async fn find(&self, user_id: &str) -> Result<Option<Account>, AccountError>;
    async fn check_funds(&self, user_id: &str, amount: Money) -> Result<(), AccountError>;
    async fn credit(&self, user_id: &str, amount: Money) -> Result<Account, AccountError>;
    async fn debit(&self, user_id: &str, amount: Money) -> Result<Account, AccountError>;
}

/// Port for the group-account ledger ("BDG"). Symmetric to
/// [`AccountRepository`]; kept as a separate trait rather than a generic
/// parameter because group accounts additionally carry an optimistic-lock
/// `version` column the individual ledger has no use for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupAccountRepository: Send + Sync {
    async fn create(&self, group_id: &str, currency: &str) -> Result<GroupAccount, AccountError>;
    async fn find(&self, group_id: &str) -> Result<Option<GroupAccount>, AccountError>;
    async fn check_funds(&self, group_id: &str, amount: Money) -> Result<(), AccountError>;
    async fn credit(&self, group_id: &str, amount: Money) -> Result<GroupAccount, AccountError>;
    async fn debit(&self, group_id: &str, amount: Money) -> Result<GroupAccount, AccountError>;
}
