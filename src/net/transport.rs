//! Transport seam between the gateway and the wire.
//!
//! DESIGN
//! ======
//! The gateway owns policy (bearer injection, refresh, teardown); the
//! transport only moves one request and returns status + body. Keeping the
//! seam this narrow lets tests script server behavior without a socket.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::ErrorBody;
use crate::config::Timeouts;
use crate::error::ApiError;

const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// REQUEST
// =============================================================================

/// Whether a request participates in bearer injection and the refresh protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Authenticated,
    Public,
}

/// One logical API request.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub auth: AuthMode,
    /// One-shot flag: set once this request has been resent after a refresh.
    pub retried: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            auth: AuthMode::Authenticated,
            retried: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// Skip bearer injection and the refresh protocol.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.auth = AuthMode::Public;
        self
    }

    /// Same request, marked as retried and carrying the rotated access token.
    #[must_use]
    pub fn into_retry(mut self, access_token: String) -> Self {
        self.bearer = Some(access_token);
        self.retried = true;
        self
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("has_bearer", &self.bearer.is_some())
            .field("auth", &self.auth)
            .field("retried", &self.retried)
            .finish()
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let parsed = if self.body.trim().is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_str(&self.body)
        };
        parsed.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Human-readable failure message from the server's error envelope.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(envelope) = serde_json::from_str::<ErrorBody>(&self.body) {
            if let Some(message) = envelope.message.or(envelope.error) {
                return message;
            }
        }
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            return format!("HTTP {}", self.status);
        }
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }

    /// Map a non-success response to the matching error.
    #[must_use]
    pub fn into_error(self) -> ApiError {
        let message = self.error_message();
        if self.is_unauthorized() {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status { status: self.status, message }
        }
    }

    /// Pass success through, map everything else to an error.
    ///
    /// # Errors
    ///
    /// Returns the mapped error for any non-2xx status.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() { Ok(self) } else { Err(self.into_error()) }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends exactly one request. No retries, no credential policy.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Production transport over `reqwest`.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url_for(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
