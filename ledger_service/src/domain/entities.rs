use chrono::{DateTime, Utc};
use common::{Money, WalletRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of money movement a transaction represents. `Transfer` is the
/// interbank case; internal peer-to-peer movement is split into its two
/// observable sides so both parties' history queries show the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Transfer,
    Contribution,
    P2pSent,
    P2pReceived,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Transfer => "transfer",
            TransactionType::Contribution => "contribution",
            TransactionType::P2pSent => "p2p-sent",
            TransactionType::P2pReceived => "p2p-received",
        };
        write!(f, "{s}")
    }
}

/// The status taxonomy of the transaction lifecycle. Only `Pending` is
/// non-terminal; every other variant is absorbing once written.
///
/// `Reverted`/`RevertFailed` wrap the status a compensation was reacting to
/// (`<X>_REVERTED` / `<X>_REVERT_FAILED` in the governing contract) rather
/// than being flat variants, so the original failure is never lost once a
/// compensation is recorded on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    FailedFunds,
    FailedAccount,
    FailedBalanceSvc,
    FailedRemote(u16),
    FailedNetwork,
    FailedUnknown,
    FailedDebitPostConfirmation,
    PendingConfirmation,
    Reverted(Box<TransactionStatus>),
    RevertFailed(Box<TransactionStatus>),
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    pub fn reverted(self) -> Self {
        TransactionStatus::Reverted(Box::new(self))
    }

    pub fn revert_failed(self) -> Self {
        TransactionStatus::RevertFailed(Box::new(self))
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::FailedFunds => write!(f, "FAILED_FUNDS"),
            TransactionStatus::FailedAccount => write!(f, "FAILED_ACCOUNT"),
            TransactionStatus::FailedBalanceSvc => write!(f, "FAILED_BALANCE_SVC"),
            TransactionStatus::FailedRemote(code) => write!(f, "FAILED_REMOTE_{code}"),
            TransactionStatus::FailedNetwork => write!(f, "FAILED_NETWORK"),
            TransactionStatus::FailedUnknown => write!(f, "FAILED_UNKNOWN"),
            TransactionStatus::FailedDebitPostConfirmation => {
                write!(f, "FAILED_DEBIT_POST_CONFIRMATION")
            }
            TransactionStatus::PendingConfirmation => write!(f, "PENDING_CONFIRMATION"),
            TransactionStatus::Reverted(inner) => write!(f, "{inner}_REVERTED"),
            TransactionStatus::RevertFailed(inner) => write!(f, "{inner}_REVERT_FAILED"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status(s)
    }
}

fn parse_status(s: &str) -> Result<TransactionStatus, String> {
    if let Some(inner) = s.strip_suffix("_REVERT_FAILED") {
        return parse_status(inner).map(|st| st.revert_failed());
    }
    if let Some(inner) = s.strip_suffix("_REVERTED") {
        return parse_status(inner).map(|st| st.reverted());
    }
    if let Some(code) = s.strip_prefix("FAILED_REMOTE_") {
        return code
            .parse::<u16>()
            .map(TransactionStatus::FailedRemote)
            .map_err(|_| format!("invalid FAILED_REMOTE_<n> status: {s}"));
    }
    match s {
        "PENDING" => Ok(TransactionStatus::Pending),
        "COMPLETED" => Ok(TransactionStatus::Completed),
        "FAILED_FUNDS" => Ok(TransactionStatus::FailedFunds),
        "FAILED_ACCOUNT" => Ok(TransactionStatus::FailedAccount),
        "FAILED_BALANCE_SVC" => Ok(TransactionStatus::FailedBalanceSvc),
        "FAILED_NETWORK" => Ok(TransactionStatus::FailedNetwork),
        "FAILED_UNKNOWN" => Ok(TransactionStatus::FailedUnknown),
        "FAILED_DEBIT_POST_CONFIRMATION" => Ok(TransactionStatus::FailedDebitPostConfirmation),
        "PENDING_CONFIRMATION" => Ok(TransactionStatus::PendingConfirmation),
        other => Err(format!("unrecognized transaction status: {other}")),
    }
}

/// An event record: the immutable-once-terminal core of the Ledger
/// Orchestrator's model. Written twice by the event store (by id, and by
/// user with descending time clustering) but represented here as one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub source: WalletRef,
    pub destination: WalletRef,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub currency: String,
    #[serde(with = "status_serde")]
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: String,
}

impl Transaction {
    pub fn new_pending(
        user_id: String,
        source: WalletRef,
        destination: WalletRef,
        transaction_type: TransactionType,
        amount: Money,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            source,
            destination,
            transaction_type,
            amount,
            currency,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
            metadata: "{}".to_string(),
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self.updated_at = Utc::now();
        self
    }

    pub fn with_metadata(mut self, metadata: String) -> Self {
        self.metadata = metadata;
        self.updated_at = Utc::now();
        self
    }
}

mod status_serde {
    use super::TransactionStatus;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(status: &TransactionStatus, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&status.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TransactionStatus, D::Error> {
        let raw = String::deserialize(d)?;
        TransactionStatus::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_failed_remote_with_code() {
        assert_eq!(TransactionStatus::FailedRemote(404).to_string(), "FAILED_REMOTE_404");
    }

    #[test]
    fn formats_reverted_and_revert_failed_around_the_original_status() {
        let reverted = TransactionStatus::FailedAccount.reverted();
        assert_eq!(reverted.to_string(), "FAILED_ACCOUNT_REVERTED");

        let revert_failed = TransactionStatus::Completed.revert_failed();
        assert_eq!(revert_failed.to_string(), "COMPLETED_REVERT_FAILED");
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        use std::str::FromStr;
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::FailedFunds,
            TransactionStatus::FailedRemote(503),
            TransactionStatus::FailedAccount.reverted(),
            TransactionStatus::FailedFunds.revert_failed(),
        ] {
            let rendered = status.to_string();
            let parsed = TransactionStatus::from_str(&rendered).unwrap();
            assert_eq!(parsed.to_string(), rendered);
        }
    }
}
