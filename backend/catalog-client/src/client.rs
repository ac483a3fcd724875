//! Typed per-verb entry points over the auth and blind retry phases.

use crate::auth_retry::AuthRetry;
use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::http::{ApiResponse, HttpExecutor, HttpMethod, RequestDescriptor, RequestExecutor, RequestOptions};
use crate::retry::{RetryPolicy, with_blind_retry};
use crate::session::{SessionStore, TokenProvider};

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Authenticated client for the catalog admin API.
///
/// Every method returns the parsed body or exactly one [`ApiError`].
#[derive(Clone)]
pub struct CatalogClient {
    auth: AuthRetry,
    retry_policy: RetryPolicy,
    default_language: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        config.validate()?;
        let executor = HttpExecutor::new(&config.base_url, config.timeout())?;

        Ok(Self::with_executor(Arc::new(executor), store, config))
    }

    /// Build around any executor; used to substitute the transport.
    pub fn with_executor(
        executor: Arc<dyn RequestExecutor>,
        store: Arc<dyn SessionStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            auth: AuthRetry::new(executor, TokenProvider::new(store)),
            retry_policy: RetryPolicy::from(&config.retry),
            default_language: config.default_language.clone(),
        }
    }

    pub async fn get_auth<T>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(HttpMethod::Get, path, None, options).await
    }

    pub async fn post_auth<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Post, path, body, options).await
    }

    /// `post_auth` for action endpoints that take no payload.
    pub async fn post_auth_empty<T>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(HttpMethod::Post, path, None, options).await
    }

    pub async fn patch_auth<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Patch, path, body, options).await
    }

    pub async fn put_auth<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Put, path, body, options).await
    }

    pub async fn delete_auth<T>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(HttpMethod::Delete, path, None, options).await
    }

    async fn send<T>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        mut options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        if options.language.is_none() {
            options.language = self.default_language.clone();
        }

        let request = RequestDescriptor::new(method, path, body, options);
        let auth = &self.auth;
        let request_ref = &request;

        let response = with_blind_retry(&self.retry_policy, request.max_retries(), move || {
            auth.execute(request_ref)
        })
        .await?;

        decode(response)
    }
}

#[track_caller]
fn encode_body<B>(body: Option<&B>) -> Result<Option<Value>, ApiError>
where
    B: Serialize + ?Sized,
{
    match body {
        Some(body) => serde_json::to_value(body)
            .map(Some)
            .map_err(|e| ApiError::invalid_request(format!("Unserializable body: {e}"))),
        None => Ok(None),
    }
}

#[track_caller]
fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    let ApiResponse { status, body } = response;

    serde_json::from_value(body)
        .map_err(|e| ApiError::parse(status, format!("Unexpected response shape: {e}")))
}
