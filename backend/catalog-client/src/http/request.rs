use common::AccessToken;

use std::fmt;

use serde_json::Value;

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// GET and DELETE never send a body, even when one is supplied.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options accepted by every verb.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Fail with `unauthorized` when no credential can be found.
    pub require_auth: bool,
    /// Refresh the session and replay once on a 401.
    pub retry_401: bool,
    /// Blind retries for server/network failures, after auth retry is exhausted.
    pub max_retries: u32,
    /// Explicit credential; takes precedence over the session's.
    pub access_token: Option<AccessToken>,
    /// Locale tag sent as `Accept-Language`.
    pub language: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            require_auth: true,
            retry_401: true,
            max_retries: 0,
            access_token: None,
            language: None,
        }
    }
}

impl RequestOptions {
    /// Public endpoints: no credential lookup at all.
    pub fn anonymous() -> Self {
        Self {
            require_auth: false,
            ..Default::default()
        }
    }

    pub fn no_retry_401(mut self) -> Self {
        self.retry_401 = false;
        self
    }

    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Immutable description of one logical call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: HttpMethod,
    path: String,
    body: Option<Value>,
    access_token: Option<AccessToken>,
    require_auth: bool,
    retry_401: bool,
    max_retries: u32,
    language: Option<String>,
}

impl RequestDescriptor {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Self {
        let RequestOptions {
            require_auth,
            retry_401,
            max_retries,
            access_token,
            language,
        } = options;

        Self {
            method,
            path: path.into(),
            body,
            access_token,
            require_auth,
            retry_401,
            max_retries,
            language,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Body to send; always `None` for verbs that do not carry one.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref().filter(|_| self.method.carries_body())
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn require_auth(&self) -> bool {
        self.require_auth
    }

    pub fn retry_401(&self) -> bool {
        self.retry_401
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}
