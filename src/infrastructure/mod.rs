// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod ga4_repository;
pub mod http_source;
pub mod service_account;
pub mod terminal;
pub mod upstream;
