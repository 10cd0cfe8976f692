//! In-process token store. Lives as long as the process does.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StoredCredentials, TokenStore};
use crate::error::StoreError;
use crate::net::types::{CredentialPair, UserProfile};

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<StoredCredentials>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given pair and no cached user.
    #[must_use]
    pub fn with_credentials(pair: &CredentialPair) -> Self {
        let mut creds = StoredCredentials::default();
        creds.apply_pair(pair);
        Self { inner: Mutex::new(creds) }
    }

    /// Store pre-seeded with arbitrary, possibly partial, state.
    #[must_use]
    pub fn with_state(state: StoredCredentials) -> Self {
        Self { inner: Mutex::new(state) }
    }

    fn lock(&self) -> MutexGuard<'_, StoredCredentials> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> StoredCredentials {
        self.lock().clone()
    }

    fn set(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        self.lock().apply_pair(pair);
        Ok(())
    }

    fn set_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.lock().user = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = StoredCredentials::default();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
