use crate::domain::entities::{Account, GroupAccount};
use chrono::{DateTime, Utc};
use common::Money;
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct AccountModel {
    pub user_id: String,
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<AccountModel> for Account {
    fn from(m: AccountModel) -> Self {
        Account {
            user_id: m.user_id,
            balance: Money::from_existing(m.balance),
            currency: m.currency,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct GroupAccountModel {
    pub group_id: String,
    pub balance: Decimal,
    pub currency: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<GroupAccountModel> for GroupAccount {
    fn from(m: GroupAccountModel) -> Self {
        GroupAccount {
            group_id: m.group_id,
            balance: Money::from_existing(m.balance),
            currency: m.currency,
            version: m.version,
            created_at: m.created_at,
        }
    }
}
