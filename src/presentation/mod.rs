// Presentation layer - HTTP surface of the report gateway
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod responses;
pub mod routes;
