//! Auth context: the session surface the front end talks to.
//!
//! DESIGN
//! ======
//! Holds the derived [`Session`] and the three operations that change it.
//! Reads reconcile against the token store: if the gateway tore the session
//! down underneath us (forced logout), `session()` reports logged out even
//! before anything republishes.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use super::session::{Session, bootstrap_session};
use super::validate;
use crate::error::ApiError;
use crate::net::gateway::{ApiClient, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH};
use crate::net::transport::ApiRequest;
use crate::net::types::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, RegisterResponse, UserProfile};

pub struct AuthContext {
    client: Arc<ApiClient>,
    session: RwLock<Session>,
    logout_timeout: Duration,
}

impl AuthContext {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, logout_timeout: Duration) -> Self {
        Self { client, session: RwLock::new(Session::loading()), logout_timeout }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> Session {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if session.is_authenticated && self.client.store().access_token().is_none() {
            *session = Session::unauthenticated();
        }
        session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated
    }

    fn publish(&self, next: Session) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Run the startup bootstrapper and publish its result.
    pub async fn bootstrap(&self) -> Session {
        self.publish(Session::loading());
        let session = bootstrap_session(&self.client).await;
        self.publish(session.clone());
        session
    }

    /// Log in and persist the issued token pair.
    ///
    /// # Errors
    ///
    /// `Validation` for bad input (no request sent), `Unauthorized` for
    /// wrong credentials, or any transport/store error. The session is left
    /// logged out on every error.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        match self.try_login(email, password).await {
            Ok(user) => {
                tracing::info!(user_id = ?user.id, "logged in");
                self.publish(Session::authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                self.publish(Session::unauthenticated());
                Err(e)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        validate::login(email, password)?;
        let body = LoginRequest { email: email.trim(), password };
        let resp: LoginResponse = self.client.post_public(LOGIN_PATH, &body).await?;

        let store = self.client.store();
        if let Err(e) = store.set(&resp.credentials()).and_then(|()| store.set_user(&resp.user)) {
            // A half-written login must not be resumed by the next bootstrap.
            if let Err(clear_err) = store.clear() {
                tracing::error!(error = %clear_err, "failed to clear partially stored login");
            }
            return Err(e.into());
        }
        Ok(resp.user)
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// `Validation` for bad input, or the server's rejection.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<RegisterResponse, ApiError> {
        validate::registration(name, email, password)?;
        let body = RegisterRequest { name: name.trim(), email: email.trim(), password };
        let resp: Option<RegisterResponse> = self.client.post_public(REGISTER_PATH, &body).await?;
        tracing::info!("account registered");
        Ok(resp.unwrap_or_default())
    }

    /// End the session. Local cleanup always runs, even if the server call
    /// fails, times out, or this future is dropped mid-flight.
    ///
    /// Returns `true` if the server acknowledged the logout.
    pub async fn logout(&self) -> bool {
        let _cleanup = LogoutCleanup { ctx: self };

        match tokio::time::timeout(self.logout_timeout, self.notify_server_logout()).await {
            Ok(Ok(())) => {
                tracing::debug!("server acknowledged logout");
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
                false
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.logout_timeout, "server logout timed out; clearing local session anyway");
                false
            }
        }
    }

    async fn notify_server_logout(&self) -> Result<(), ApiError> {
        let creds = self.client.store().get();
        let Some(refresh_token) = creds.refresh_token else {
            return Ok(());
        };
        let body = serde_json::to_value(RefreshRequest { refresh_token: &refresh_token })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        // Bypass the retry protocol: a 401 here must not trigger a refresh.
        let request = ApiRequest::post(LOGOUT_PATH)
            .public()
            .with_bearer(creds.access_token)
            .with_body(body);
        self.client.execute(request).await?;
        Ok(())
    }

    fn finish_logout(&self) {
        if let Err(e) = self.client.store().clear() {
            tracing::error!(error = %e, "failed to clear session store on logout");
        }
        self.publish(Session::unauthenticated());
        self.client.navigator().redirect_to_login();
        tracing::info!("logged out");
    }
}

/// Runs local logout cleanup when dropped.
struct LogoutCleanup<'a> {
    ctx: &'a AuthContext,
}

impl Drop for LogoutCleanup<'_> {
    fn drop(&mut self) {
        self.ctx.finish_logout();
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
