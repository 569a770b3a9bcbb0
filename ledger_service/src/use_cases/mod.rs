pub mod contribution;
pub mod deposit;
pub mod get_history;
pub mod idempotency;
pub mod interbank_transfer;
pub mod p2p_transfer;
pub mod status;
