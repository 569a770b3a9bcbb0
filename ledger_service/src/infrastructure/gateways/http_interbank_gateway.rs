use crate::domain::gateways::{InterbankAcceptance, InterbankGateway, InterbankIntent, RemoteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// `InterbankGateway` over the Interbank Gateway's HTTP contract. Unlike the
/// BA client, 4xx/5xx here are carried through as the status code itself
/// (`FAILED_REMOTE_<n>`) rather than collapsed into a fixed handful of
/// domain errors, since the remote bank's rejection reasons are opaque to
/// the orchestrator (SPEC_FULL.md §4.1.5).
pub struct HttpInterbankGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct TransferRequest {
    origin_bank: String,
    origin_account_id: String,
    destination_bank: String,
    destination_phone_number: String,
    amount: rust_decimal::Decimal,
    currency: String,
    transaction_id: String,
    description: String,
}

#[derive(Deserialize)]
struct TransferResponse {
    remote_tx_id: String,
}

impl HttpInterbankGateway {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl InterbankGateway for HttpInterbankGateway {
    async fn send(&self, intent: InterbankIntent) -> Result<InterbankAcceptance, RemoteError> {
        let url = format!("{}/interbank/transfers", self.base_url);
        let request = TransferRequest {
            origin_bank: intent.origin_bank,
            origin_account_id: intent.origin_account_id,
            destination_bank: intent.destination_bank,
            destination_phone_number: intent.destination_phone_number,
            amount: intent.amount.amount(),
            currency: intent.currency,
            transaction_id: intent.transaction_id.to_string(),
            description: intent.description,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body: TransferResponse = response
                    .json()
                    .await
                    .map_err(|e| RemoteError::Network(e.to_string()))?;
                Ok(InterbankAcceptance {
                    remote_tx_id: body.remote_tx_id,
                })
            }
            status => Err(RemoteError::Rejected(status.as_u16())),
        }
    }
}
