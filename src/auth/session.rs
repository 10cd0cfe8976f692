//! Session state and the startup bootstrapper.
//!
//! SYSTEM CONTEXT
//! ==============
//! Nothing about the session is persisted except the tokens (and a cached
//! user). On every start the bootstrapper asks the server whether the stored
//! access token is still good, rotates it once if not, and otherwise drops
//! the stored state. Callers must not branch on `is_authenticated` while
//! `loading` is still true.

use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::types::UserProfile;

/// Derived session view exposed to the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl Session {
    /// Before the bootstrapper has settled.
    #[must_use]
    pub fn loading() -> Self {
        Self { is_authenticated: false, user: None, loading: true }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self { is_authenticated: false, user: None, loading: false }
    }

    #[must_use]
    pub fn authenticated(user: UserProfile) -> Self {
        Self { is_authenticated: true, user: Some(user), loading: false }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

/// Reconcile stored tokens with the server. Always returns a settled session.
///
/// - no tokens: unauthenticated, no network call
/// - profile fetch succeeds: authenticated, user cached
/// - 401 (or no access token) with a refresh token: one refresh, then one
///   retried profile fetch
/// - anything else: store cleared, unauthenticated
///
/// Never redirects; an unauthenticated result already means "show login".
pub async fn bootstrap_session(client: &ApiClient) -> Session {
    let store = client.store();
    let creds = store.get();
    if creds.has_no_tokens() {
        tracing::debug!("no stored credentials; starting logged out");
        return Session::unauthenticated();
    }

    let first = match creds.access_token {
        Some(token) => client.fetch_profile_with(Some(token)).await,
        None => Err(ApiError::Unauthorized { message: "no access token stored".into() }),
    };

    let verified = match first {
        Err(ApiError::Unauthorized { .. }) if creds.refresh_token.is_some() => {
            tracing::info!("stored access token rejected; attempting refresh");
            refresh_and_refetch(client).await
        }
        other => other,
    };

    match verified {
        Ok(user) => {
            if let Err(e) = store.set_user(&user) {
                tracing::warn!(error = %e, "failed to cache user profile");
            }
            tracing::info!(user_id = ?user.id, "session restored");
            Session::authenticated(user)
        }
        Err(e) => {
            tracing::info!(error = %e, "stored session not usable; clearing");
            if let Err(clear_err) = store.clear() {
                tracing::error!(error = %clear_err, "failed to clear session store");
            }
            Session::unauthenticated()
        }
    }
}

async fn refresh_and_refetch(client: &ApiClient) -> Result<UserProfile, ApiError> {
    let pair = client.refresh_credentials().await?;
    client.fetch_profile_with(Some(pair.access_token)).await
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
