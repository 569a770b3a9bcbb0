use crate::domain::entities::TransactionStatus;
use crate::domain::gateways::RemoteError;

/// Maps a Balance Authority failure onto the status taxonomy. Shared by
/// every saga that calls BA (deposit has its own coarser rule per
/// SPEC_FULL.md §4.1.2 and does not use this).
pub fn classify_ba_error(e: &RemoteError) -> TransactionStatus {
    match e {
        RemoteError::NotFound => TransactionStatus::FailedAccount,
        RemoteError::InsufficientFunds => TransactionStatus::FailedFunds,
        RemoteError::Network(_) => TransactionStatus::FailedNetwork,
        RemoteError::Rejected(_) => TransactionStatus::FailedUnknown,
    }
}

/// Maps an Interbank Gateway failure onto the status taxonomy, per
/// SPEC_FULL.md §4.1.5: network errors are FAILED_NETWORK, any 4xx/5xx
/// response is FAILED_REMOTE_<code>.
pub fn classify_ig_error(e: &RemoteError) -> TransactionStatus {
    match e {
        RemoteError::Rejected(code) => TransactionStatus::FailedRemote(*code),
        RemoteError::Network(_) => TransactionStatus::FailedNetwork,
        RemoteError::NotFound => TransactionStatus::FailedRemote(404),
        RemoteError::InsufficientFunds => TransactionStatus::FailedRemote(400),
    }
}
