use crate::domain::gateways::{BalanceGateway, RemoteError};
use async_trait::async_trait;
use common::Money;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info};

/// `BalanceGateway` over the Balance Authority's plain JSON HTTP contract
/// (SPEC_FULL.md §6.1). Individual and group accounts hit different path
/// prefixes (`/balance/...` vs `/group_balance/...`) but share the same
/// request/response shape.
pub struct HttpBalanceGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct AmountRequest<'a> {
    user_id: &'a str,
    amount: rust_decimal::Decimal,
}

#[derive(Serialize)]
struct GroupAmountRequest<'a> {
    group_id: &'a str,
    amount: rust_decimal::Decimal,
}

impl HttpBalanceGateway {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn post(&self, path: &str, body: impl Serialize) -> Result<(), RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                Err(RemoteError::InsufficientFunds)
            }
            status => {
                error!(status = %status, url = %url, "balance authority rejected the request");
                Err(RemoteError::Rejected(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl BalanceGateway for HttpBalanceGateway {
    async fn check_funds(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        info!(user_id, %amount, "checking funds with balance authority");
        self.post(
            "/balance/check",
            AmountRequest {
                user_id,
                amount: amount.amount(),
            },
        )
        .await
    }

    async fn credit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        self.post(
            "/balance/credit",
            AmountRequest {
                user_id,
                amount: amount.amount(),
            },
        )
        .await
    }

    async fn debit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        self.post(
            "/balance/debit",
            AmountRequest {
                user_id,
                amount: amount.amount(),
            },
        )
        .await
    }

    async fn check_group_funds(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        self.post(
            "/group_balance/check",
            GroupAmountRequest {
                group_id,
                amount: amount.amount(),
            },
        )
        .await
    }

    async fn credit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        self.post(
            "/group_balance/credit",
            GroupAmountRequest {
                group_id,
                amount: amount.amount(),
            },
        )
        .await
    }

    async fn debit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        self.post(
            "/group_balance/debit",
            GroupAmountRequest {
                group_id,
                amount: amount.amount(),
            },
        )
        .await
    }
}
