//! Client for the internal recipe REST API.
//!
//! Every call goes through [`ApiClient::call`]. Failures are logged with the
//! method and address and then returned unchanged; deciding whether a failure
//! is recoverable is left to the caller (see [`crate::gate`] for the one place
//! that recovers).

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, COOKIE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use crate::models::SessionCredential;

/// HTTP method of a REST call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The address could not be turned into a URL.
    #[error("invalid address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// Network or protocol failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code returned by the API, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single REST call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub address: String,
    pub method: Method,
    /// Query parameters for GET, JSON body otherwise.
    pub payload: Option<Value>,
    /// Session cookie to forward.
    pub credential: Option<SessionCredential>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            method,
            payload: None,
            credential: None,
        }
    }

    #[must_use]
    pub fn get(address: impl Into<String>) -> Self {
        Self::new(Method::Get, address)
    }

    #[must_use]
    pub fn post(address: impl Into<String>) -> Self {
        Self::new(Method::Post, address)
    }

    #[must_use]
    pub fn put(address: impl Into<String>) -> Self {
        Self::new(Method::Put, address)
    }

    #[must_use]
    pub fn delete(address: impl Into<String>) -> Self {
        Self::new(Method::Delete, address)
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn with_credential(mut self, credential: &SessionCredential) -> Self {
        self.credential = Some(credential.clone());
        self
    }
}

/// Client for the internal REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new REST API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Base URL that relative addresses resolve against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an address: absolute URLs are used as-is, anything else is
    /// taken relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidAddress` if the result is not a valid URL.
    pub fn resolve(&self, address: &str) -> Result<Url, ApiError> {
        if let Ok(url) = Url::parse(address) {
            return Ok(url);
        }
        self.inner
            .base_url
            .join(address.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidAddress {
                address: address.to_string(),
                source,
            })
    }

    /// Issue a REST call and decode the JSON response.
    ///
    /// An empty response body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns the underlying failure after logging it.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let result = self.send(&request).await;
        if let Err(e) = &result {
            tracing::error!(
                method = %request.method,
                address = %request.address,
                error = %e,
                "REST call failed"
            );
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let url = self.resolve(&request.address)?;
        let client = &self.inner.client;

        let mut builder = match request.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url),
            Method::Put => client.put(url),
            Method::Delete => client.delete(url),
        }
        .header(ACCEPT, "application/json");

        if let Some(payload) = &request.payload {
            builder = match request.method {
                Method::Get => builder.query(payload),
                Method::Post | Method::Put | Method::Delete => builder.json(payload),
            };
        }

        if let Some(credential) = &request.credential {
            builder = builder.header(COOKIE, credential.cookie_header());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        let body = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: parse_base_url(base).unwrap(),
        })
    }

    #[test]
    fn test_method_serde_and_display() {
        let method: Method = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(method, Method::Delete);
        assert_eq!(Method::default(), Method::Get);
        assert_eq!(Method::Put.to_string(), "put");
    }

    #[test]
    fn test_resolve_relative_address() {
        let client = client("http://api.internal/v1");
        assert_eq!(
            client.resolve("api/get-recipes?page=1").unwrap().as_str(),
            "http://api.internal/v1/api/get-recipes?page=1"
        );
        assert_eq!(
            client.resolve("/api/profile").unwrap().as_str(),
            "http://api.internal/v1/api/profile"
        );
    }

    #[test]
    fn test_resolve_absolute_address() {
        let client = client("http://api.internal/");
        assert_eq!(
            client.resolve("https://other.example.com/x").unwrap().as_str(),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn test_request_builders() {
        let credential = SessionCredential::new("rf_session=abc");
        let request = ApiRequest::put("api/like-recipe")
            .with_payload(serde_json::json!({"recipeId": "r1"}))
            .with_credential(&credential);

        assert_eq!(request.method, Method::Put);
        assert_eq!(request.address, "api/like-recipe");
        assert!(request.payload.is_some());
        assert_eq!(
            request.credential.as_ref().map(SessionCredential::cookie_header),
            Some("rf_session=abc")
        );
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        };
        assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_GATEWAY));
        assert_eq!(err.to_string(), "unexpected status 502 Bad Gateway: upstream");
    }
}
