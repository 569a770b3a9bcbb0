use crate::domain::gateways::{RecipientDirectoryGateway, RemoteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// `RecipientDirectoryGateway` over the Recipient Directory's HTTP contract.
/// Read-only: a single phone-number lookup resolving to a user id.
pub struct HttpRecipientDirectoryGateway {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    user_id: String,
}

impl HttpRecipientDirectoryGateway {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl RecipientDirectoryGateway for HttpRecipientDirectoryGateway {
    async fn lookup_by_phone(&self, phone: &str) -> Result<String, RemoteError> {
        let url = format!("{}/users/by-phone/{}", self.base_url, phone);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body: LookupResponse = response
                    .json()
                    .await
                    .map_err(|e| RemoteError::Network(e.to_string()))?;
                Ok(body.user_id)
            }
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            status => Err(RemoteError::Rejected(status.as_u16())),
        }
    }
}
