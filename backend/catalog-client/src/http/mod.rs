//! One HTTP round trip per call, described as plain data.

pub mod executor;
pub mod headers;
pub mod request;

pub use executor::{ApiResponse, HttpExecutor, RequestExecutor};
pub use request::{HttpMethod, RequestDescriptor, RequestOptions};
