//! Types shared by the Balance Authority and the Ledger Orchestrator across
//! their HTTP boundary: monetary amounts, currency codes, and the tagged
//! wallet references that appear in transaction records.

pub mod money;
pub mod wallet_ref;

pub use money::{Currency, CurrencyError, Money};
pub use wallet_ref::{WalletKind, WalletRef};
