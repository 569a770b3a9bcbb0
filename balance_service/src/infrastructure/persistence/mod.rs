pub mod models;
pub mod postgres_account_repository;
