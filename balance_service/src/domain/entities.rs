use chrono::{DateTime, Utc};
use common::Money;

/// An individual account ("BDI"). One per user id; created once, never
/// deleted, mutated only through [`crate::domain::repository::AccountRepository`]'s
/// locking credit/debit operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub user_id: String,
    pub balance: Money,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_id: String, currency: String) -> Self {
        Self {
            user_id,
            balance: Money::zero(),
            currency,
            created_at: Utc::now(),
        }
    }
}

/// A group account ("BDG"). Same shape as [`Account`] plus a `version`
/// column used for optimistic-lock-style conflict detection at the ORM
/// layer, layered on top of the row-level lock every mutation still takes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAccount {
    pub group_id: String,
    pub balance: Money,
    pub currency: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl GroupAccount {
    pub fn new(group_id: String, currency: String) -> Self {
        Self {
            group_id,
            balance: Money::zero(),
            currency,
            version: 0,
            created_at: Utc::now(),
        }
    }
}
