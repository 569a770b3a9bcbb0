use std::env;
use std::time::Duration;

/// Process configuration, read once at startup per SPEC_FULL.md §5's "no
/// mutable process-global state" rule.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub balance_authority_url: String,
    pub recipient_directory_url: String,
    pub interbank_gateway_url: String,
    pub interbank_gateway_api_key: String,

    pub event_store_contact_point: String,
    pub event_store_keyspace_replication_factor: u32,

    pub ba_client_timeout: Duration,
    pub rd_client_timeout: Duration,
    pub ig_client_timeout: Duration,

    pub reconciliation_interval: Duration,
    pub reconciliation_stuck_after: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse()?,

            balance_authority_url: env::var("BALANCE_AUTHORITY_URL")?,
            recipient_directory_url: env::var("RECIPIENT_DIRECTORY_URL")?,
            interbank_gateway_url: env::var("INTERBANK_GATEWAY_URL")?,
            interbank_gateway_api_key: env::var("INTERBANK_GATEWAY_API_KEY")?,

            event_store_contact_point: env::var("EVENT_STORE_CONTACT_POINT")?,
            event_store_keyspace_replication_factor: env::var("EVENT_STORE_REPLICATION_FACTOR")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,

            ba_client_timeout: Duration::from_secs(
                env::var("BA_CLIENT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            ),
            rd_client_timeout: Duration::from_secs(
                env::var("RD_CLIENT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            ),
            ig_client_timeout: Duration::from_secs(
                env::var("IG_CLIENT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()?,
            ),

            reconciliation_interval: Duration::from_secs(
                env::var("RECONCILIATION_INTERVAL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            ),
            reconciliation_stuck_after: Duration::from_secs(
                env::var("RECONCILIATION_STUCK_AFTER_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            ),
        })
    }
}
