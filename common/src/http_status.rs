//! HTTP status code utilities for failure classification.

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages. The value `0`
/// is reserved for failures where no HTTP response was received at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    /// Transport-level failure: connection refused, DNS, timeout, broken body.
    pub const NETWORK: HttpStatusCode = HttpStatusCode(0);
    pub const BAD_REQUEST: HttpStatusCode = HttpStatusCode(400);
    pub const UNAUTHORIZED: HttpStatusCode = HttpStatusCode(401);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// No HTTP response was received.
    pub fn is_network(&self) -> bool {
        self.0 == 0
    }

    /// 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx and above. Non-standard codes past 599 count as server failures.
    pub fn is_server_error(&self) -> bool {
        self.0 >= 500
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
