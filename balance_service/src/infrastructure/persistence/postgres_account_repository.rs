use crate::domain::entities::{Account, GroupAccount};
use crate::domain::error::AccountError;
use crate::domain::repository::{AccountRepository, GroupAccountRepository};
use crate::infrastructure::persistence::models::{AccountModel, GroupAccountModel};
use async_trait::async_trait;
use common::Money;
use sqlx::PgPool;

/// Repository for the individual-account ledger, backed by PostgreSQL.
///
/// Unlike the teacher's single atomic `UPDATE balance = balance + $1`
/// statement, `credit`/`debit` here open an explicit transaction and take a
/// `SELECT ... FOR UPDATE` row lock before computing the new balance, per the
/// contract's "row-level exclusive lock held for the whole txn" requirement.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, user_id: &str, currency: &str) -> Result<Account, AccountError> {
        let model = sqlx::query_as::<_, AccountModel>(
            r#"
            INSERT INTO accounts (user_id, balance, currency, created_at)
            VALUES ($1, 0, $2, now())
            RETURNING user_id, balance, currency, created_at
            "#,
        )
        .bind(user_id)
        .bind(currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("accounts_pkey") || msg.contains("accounts_user_id_key") {
                AccountError::AlreadyExists(user_id.to_string())
            } else {
                AccountError::RepositoryError(msg)
            }
        })?;

        Ok(model.into())
    }

    async fn find(&self, user_id: &str) -> Result<Option<Account>, AccountError> {
        let model = sqlx::query_as::<_, AccountModel>(
            "SELECT user_id, balance, currency, created_at FROM accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn check_funds(&self, user_id: &str, amount: Money) -> Result<(), AccountError> {
        let account = self
            .find(user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(user_id.to_string()))?;

        if account.balance.is_sufficient_for(amount) {
            Ok(())
        } else {
            Err(AccountError::InsufficientFunds(user_id.to_string()))
        }
    }

    async fn credit(&self, user_id: &str, amount: Money) -> Result<Account, AccountError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        let locked = sqlx::query_as::<_, AccountModel>(
            "SELECT user_id, balance, currency, created_at FROM accounts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?
        .ok_or_else(|| AccountError::NotFound(user_id.to_string()))?;

        let new_balance = Money::from_existing(locked.balance).checked_add(amount);

        let updated = sqlx::query_as::<_, AccountModel>(
            "UPDATE accounts SET balance = $1 WHERE user_id = $2 RETURNING user_id, balance, currency, created_at",
        )
        .bind(new_balance.amount())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(updated.into())
    }

    async fn debit(&self, user_id: &str, amount: Money) -> Result<Account, AccountError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        let locked = sqlx::query_as::<_, AccountModel>(
            "SELECT user_id, balance, currency, created_at FROM accounts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?
        .ok_or_else(|| AccountError::NotFound(user_id.to_string()))?;

        // Re-check under the lock: the caller's advisory check_funds() call
        // may be stale by the time this transaction acquires the row.
        let new_balance = Money::from_existing(locked.balance)
            .checked_sub(amount)
            .ok_or_else(|| AccountError::InsufficientFunds(user_id.to_string()))?;

        let updated = sqlx::query_as::<_, AccountModel>(
            "UPDATE accounts SET balance = $1 WHERE user_id = $2 RETURNING user_id, balance, currency, created_at",
        )
        .bind(new_balance.amount())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(updated.into())
    }
}

/// Repository for the group-account ledger, backed by PostgreSQL. Mirrors
/// [`PostgresAccountRepository`]'s locking discipline and additionally bumps
/// the optimistic-lock `version` column inside the same locked transaction.
pub struct PostgresGroupAccountRepository {
    pool: PgPool,
}

impl PostgresGroupAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupAccountRepository for PostgresGroupAccountRepository {
    async fn create(&self, group_id: &str, currency: &str) -> Result<GroupAccount, AccountError> {
        let model = sqlx::query_as::<_, GroupAccountModel>(
            r#"
            INSERT INTO group_accounts (group_id, balance, currency, version, created_at)
            VALUES ($1, 0, $2, 0, now())
            RETURNING group_id, balance, currency, version, created_at
            "#,
        )
        .bind(group_id)
        .bind(currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("group_accounts_pkey") || msg.contains("group_accounts_group_id_key") {
                AccountError::AlreadyExists(group_id.to_string())
            } else {
                AccountError::RepositoryError(msg)
            }
        })?;

        Ok(model.into())
    }

    async fn find(&self, group_id: &str) -> Result<Option<GroupAccount>, AccountError> {
        let model = sqlx::query_as::<_, GroupAccountModel>(
            "SELECT group_id, balance, currency, version, created_at FROM group_accounts WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn check_funds(&self, group_id: &str, amount: Money) -> Result<(), AccountError> {
        let account = self
            .find(group_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(group_id.to_string()))?;

        if account.balance.is_sufficient_for(amount) {
            Ok(())
        } else {
            Err(AccountError::InsufficientFunds(group_id.to_string()))
        }
    }

    async fn credit(&self, group_id: &str, amount: Money) -> Result<GroupAccount, AccountError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        let locked = sqlx::query_as::<_, GroupAccountModel>(
            "SELECT group_id, balance, currency, version, created_at FROM group_accounts WHERE group_id = $1 FOR UPDATE",
        )
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?
        .ok_or_else(|| AccountError::NotFound(group_id.to_string()))?;

        let new_balance = Money::from_existing(locked.balance).checked_add(amount);

        let updated = sqlx::query_as::<_, GroupAccountModel>(
            "UPDATE group_accounts SET balance = $1, version = version + 1 WHERE group_id = $2 AND version = $3 RETURNING group_id, balance, currency, version, created_at",
        )
        .bind(new_balance.amount())
        .bind(group_id)
        .bind(locked.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(updated.into())
    }

    async fn debit(&self, group_id: &str, amount: Money) -> Result<GroupAccount, AccountError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        let locked = sqlx::query_as::<_, GroupAccountModel>(
            "SELECT group_id, balance, currency, version, created_at FROM group_accounts WHERE group_id = $1 FOR UPDATE",
        )
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?
        .ok_or_else(|| AccountError::NotFound(group_id.to_string()))?;

        let new_balance = Money::from_existing(locked.balance)
            .checked_sub(amount)
            .ok_or_else(|| AccountError::InsufficientFunds(group_id.to_string()))?;

        let updated = sqlx::query_as::<_, GroupAccountModel>(
            "UPDATE group_accounts SET balance = $1, version = version + 1 WHERE group_id = $2 AND version = $3 RETURNING group_id, balance, currency, version, created_at",
        )
        .bind(new_balance.amount())
        .bind(group_id)
        .bind(locked.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::RepositoryError(e.to_string()))?;

        Ok(updated.into())
    }
}
