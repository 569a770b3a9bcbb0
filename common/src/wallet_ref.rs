use serde::{Deserialize, Serialize};

/// The kind of endpoint a transaction's source or destination refers to.
///
/// A source is one of `External | Individual | Group`; a destination is one
/// of `Individual | Group | ExternalBank`. Both share this single enum
/// (rather than two separate source/destination enums) because the event
/// record refers to accounts only by opaque id strings tagged with a kind,
/// never by a typed pointer into another service's data (SPEC_FULL.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    External,
    Individual,
    Group,
    ExternalBank,
}

/// An opaque reference to a transaction endpoint: what kind of account it is,
/// and its id as a plain string (a user id, a group id, or a bank code -
/// never a foreign key the event store could dereference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRef {
    pub kind: WalletKind,
    pub id: String,
}

impl WalletRef {
    pub fn external() -> Self {
        Self {
            kind: WalletKind::External,
            id: "external".to_string(),
        }
    }

    pub fn individual(user_id: impl Into<String>) -> Self {
        Self {
            kind: WalletKind::Individual,
            id: user_id.into(),
        }
    }

    pub fn group(group_id: impl Into<String>) -> Self {
        Self {
            kind: WalletKind::Group,
            id: group_id.into(),
        }
    }

    pub fn external_bank(bank_code: impl Into<String>) -> Self {
        Self {
            kind: WalletKind::ExternalBank,
            id: bank_code.into(),
        }
    }
}
