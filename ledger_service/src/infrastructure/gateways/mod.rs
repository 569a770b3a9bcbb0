pub mod fakes;
pub mod http_balance_gateway;
pub mod http_interbank_gateway;
pub mod http_recipient_directory_gateway;
