use crate::error::ApiError;

use common::AccessToken;

use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers for one call: JSON content type always, bearer and locale only when present.
pub fn build_headers(
    token: Option<&AccessToken>,
    language: Option<&str>,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&token.bearer())
            .map_err(|_| ApiError::invalid_request("Access token contains invalid characters"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        let value = HeaderValue::from_str(language).map_err(|_| {
            ApiError::invalid_request(format!("Invalid language tag: {language}"))
        })?;
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Ok(headers)
}
