//! Authenticated request gateway.
//!
//! ARCHITECTURE
//! ============
//! Every resource call goes through [`ApiClient::execute`]. Before dispatch
//! the current access token is attached as a bearer credential. A 401 on an
//! authenticated request moves the request through a small state machine:
//!
//! ```text
//! Initial -> Sent -> Success
//!                 -> AuthFailed -> Refreshing -> Retried -> Sent -> Success
//!                                             -> Failed
//! ```
//!
//! The `retried` flag on [`ApiRequest`] is one-shot: a request that already
//! went through `Retried` and sees a second 401 goes straight to `Failed`.
//! `Failed` clears the token store, redirects to login, and returns the
//! original authorization error.
//!
//! TRADE-OFFS
//! ==========
//! Refreshes are per request and not deduplicated. Two requests that both
//! see a 401 each rotate the token pair; with a server that invalidates the
//! previous refresh token on rotation, the slower one fails and logs out.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse, AuthMode, ReqwestTransport, Transport};
use super::types::{CredentialPair, RefreshRequest, UserProfile};
use crate::auth::navigator::Navigator;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::store::TokenStore;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const PROFILE_PATH: &str = "/api/users/profile";

/// Where a logical request is in the refresh-and-retry protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sent,
    AuthFailed,
    Refreshing,
    Retried,
    Failed,
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { transport, store, navigator }
    }

    /// Build a client that talks to `config.api_url` over `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.api_url, config.timeouts)?;
        Ok(Self::new(Arc::new(transport), store, navigator))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    // =========================================================================
    // RETRY PROTOCOL
    // =========================================================================

    /// Send a request, refreshing and retrying once on 401.
    ///
    /// # Errors
    ///
    /// - `Network` if the transport fails (never retried here)
    /// - `Unauthorized` if the session could not be recovered; the store has
    ///   been cleared and the navigator told to show login
    /// - `Status` for any other non-2xx response
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.auth == AuthMode::Public {
            return self.dispatch(&request).await?.into_result();
        }

        let mut request = request.with_bearer(self.store.access_token());
        loop {
            let response = self.dispatch(&request).await?;
            trace_phase(&request, Phase::Sent);
            if !response.is_unauthorized() {
                return response.into_result();
            }

            trace_phase(&request, Phase::AuthFailed);
            let original = response.into_error();
            if request.retried {
                tracing::warn!(path = %request.path, "request rejected again after refresh; ending session");
                trace_phase(&request, Phase::Failed);
                self.force_logout();
                return Err(original);
            }

            trace_phase(&request, Phase::Refreshing);
            let pair = match self.refresh_credentials().await {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(path = %request.path, error = %e, "token refresh failed; ending session");
                    trace_phase(&request, Phase::Failed);
                    self.force_logout();
                    return Err(original);
                }
            };

            request = request.into_retry(pair.access_token);
            trace_phase(&request, Phase::Retried);
        }
    }

    /// Rotate the token pair using the stored refresh token.
    ///
    /// On success the new pair is already persisted. Never clears the store
    /// or redirects; callers decide what a failure means.
    ///
    /// # Errors
    ///
    /// Returns `RefreshRejected` if no refresh token is stored, the refresh
    /// call fails, or the response is not a token pair. Returns `Store` if
    /// the rotated pair cannot be persisted.
    pub async fn refresh_credentials(&self) -> Result<CredentialPair, ApiError> {
        let Some(refresh_token) = self.store.refresh_token() else {
            return Err(ApiError::RefreshRejected("no refresh token stored".into()));
        };

        tracing::info!("refreshing access token");
        let body = encode(&RefreshRequest { refresh_token: &refresh_token })?;
        let request = ApiRequest::post(REFRESH_PATH).public().with_body(body);
        let response = self
            .dispatch(&request)
            .await
            .map_err(|e| ApiError::RefreshRejected(e.to_string()))?;
        if !response.is_success() {
            return Err(ApiError::RefreshRejected(format!("{}: {}", response.status, response.error_message())));
        }

        let pair: CredentialPair = response
            .json()
            .map_err(|e| ApiError::RefreshRejected(e.to_string()))?;
        self.store.set(&pair)?;
        tracing::info!("access token refreshed");
        Ok(pair)
    }

    /// Clear every stored credential and send the user to login.
    pub fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "failed to clear session store during forced logout");
        }
        self.navigator.redirect_to_login();
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, retried = request.retried, "dispatching request");
        let result = self.transport.send(request).await;
        match &result {
            Ok(response) => {
                tracing::debug!(path = %request.path, status = response.status, "response received");
            }
            Err(e) => tracing::debug!(path = %request.path, error = %e, "transport failed"),
        }
        result
    }

    // =========================================================================
    // PROFILE (no retry protocol)
    // =========================================================================

    /// Fetch `/api/users/profile` with an explicit token, bypassing the
    /// retry protocol. Used by the bootstrapper, which owns its own policy.
    pub(crate) async fn fetch_profile_with(&self, access_token: Option<String>) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::get(PROFILE_PATH).public().with_bearer(access_token);
        self.dispatch(&request).await?.into_result()?.json()
    }

    // =========================================================================
    // TYPED HELPERS
    // =========================================================================

    /// Execute and decode the response body.
    ///
    /// # Errors
    ///
    /// Any error from [`ApiClient::execute`], or `Decode` on a body mismatch.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(ApiRequest::post(path).with_body(encode(body)?)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(ApiRequest::put(path).with_body(encode(body)?)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// POST without credentials or the refresh protocol (login, register).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`]; a 401 comes back as `Unauthorized`
    /// without touching the store.
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(ApiRequest::post(path).public().with_body(encode(body)?)).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body encode failed: {e}")))
}

fn trace_phase(request: &ApiRequest, phase: Phase) {
    tracing::debug!(path = %request.path, retried = request.retried, phase = ?phase, "request phase");
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
