use crate::error::{ApiError, ClientError};
use crate::http::headers::build_headers;
use crate::http::request::RequestDescriptor;

use common::{AccessToken, HttpStatusCode};

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// Status and parsed body of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: HttpStatusCode,
    pub body: Value,
}

/// Performs exactly one HTTP round trip per call.
///
/// Implementations hold no state between calls and never return a raw
/// transport error: every failure is an [`ApiError`].
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed executor rooted at the API base URL.
#[derive(Clone)]
pub struct HttpExecutor {
    base_url: Url,
    client: Client,
}

impl HttpExecutor {
    pub fn new(base_url_str: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url_str)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Appends `path` (query string included) to the base URL.
    ///
    /// Plain concatenation rather than `Url::join`, which would drop any
    /// path prefix on the base such as `/api/v1`.
    #[track_caller]
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');

        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::invalid_request(format!("Invalid endpoint '{path}': {e}")))
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(request.path())?;
        let headers = build_headers(token, request.language())?;

        let mut builder = self
            .client
            .request(request.method().into(), url)
            .headers(headers);

        if let Some(body) = request.body() {
            let payload = serde_json::to_vec(body)
                .map_err(|e| ApiError::invalid_request(format!("Unserializable body: {e}")))?;
            builder = builder.body(payload);
        }

        debug!(
            "{} {} (auth: {})",
            request.method(),
            request.path(),
            token.is_some()
        );

        let response = builder.send().await?;
        let status = HttpStatusCode(response.status().as_u16());
        let bytes = response.bytes().await?;

        parse_response(status, &bytes)
    }
}

/// Turns a raw status and body into a typed result or a classified failure.
///
/// A blank body parses as JSON `null`.
#[track_caller]
pub(crate) fn parse_response(status: HttpStatusCode, bytes: &[u8]) -> Result<ApiResponse, ApiError> {
    let body: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(bytes) {
            Ok(body) => body,
            Err(e) => {
                return Err(ApiError::parse(
                    status,
                    format!("Malformed response body (HTTP {status}): {e}"),
                ));
            }
        }
    };

    if !status.is_success() {
        return Err(ApiError::from_response(status, &body));
    }

    Ok(ApiResponse { status, body })
}
