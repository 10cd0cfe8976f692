//! Token store: persisted access token, refresh token, and cached user.
//!
//! DESIGN
//! ======
//! The store is a dumb map: no validation, no expiry checks. The gateway,
//! bootstrapper, and auth context are the only writers. Absent fields are
//! normal and mean "not logged in" rather than an error.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::net::types::{CredentialPair, UserProfile};

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// Snapshot of everything the store holds. Every field may be absent.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl StoredCredentials {
    /// `true` when neither token is present.
    #[must_use]
    pub fn has_no_tokens(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// `true` when nothing at all is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.has_no_tokens() && self.user.is_none()
    }

    pub(crate) fn apply_pair(&mut self, pair: &CredentialPair) {
        self.access_token = Some(pair.access_token.clone());
        self.refresh_token = Some(pair.refresh_token.clone());
    }
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

/// Get/set/clear contract over the persisted credentials.
///
/// Implementations are shared across every in-flight request, so all methods
/// take `&self`.
pub trait TokenStore: Send + Sync {
    /// Current stored credentials. Unreadable state reads as empty.
    fn get(&self) -> StoredCredentials;

    /// Overwrite both tokens. The cached user is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    fn set(&self, pair: &CredentialPair) -> Result<(), StoreError>;

    /// Overwrite the cached user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    fn set_user(&self, user: &UserProfile) -> Result<(), StoreError>;

    /// Remove both tokens and the cached user. Clearing an empty store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state exists but cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;

    fn access_token(&self) -> Option<String> {
        self.get().access_token
    }

    fn refresh_token(&self) -> Option<String> {
        self.get().refresh_token
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
