pub mod api;
pub mod client;
pub mod config;
pub mod logger;

pub use api::{ApiError, ErrorBody, ErrorCode, FieldError, GENERIC_ERROR_MESSAGE};
pub use client::ClientError;
pub use config::ConfigError;
pub use logger::LoggerError;
