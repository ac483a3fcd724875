//! Shared leaf types for the catalog admin client.
//!
//! These types carry no HTTP dependency so they can be used by any layer
//! that needs to describe a failure location, a response status, or a
//! bearer credential.
//!
//! ## Architecture
//!
//! - **common** (this crate): location tracking, status codes, credentials
//! - **catalog-client**: request execution, auth retry, verb facade

pub mod access_token;
pub mod error;
pub mod http_status;

#[cfg(test)]
mod tests;

pub use access_token::AccessToken;
pub use error::error_location::ErrorLocation;
pub use error::token_error::TokenError;
pub use http_status::HttpStatusCode;
