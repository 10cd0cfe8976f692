//! watchlog: client for a media-tracking service.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server owns all data. This crate owns the session: it persists the
//! access/refresh token pair, injects bearer credentials, and transparently
//! rotates an expired access token once per request before giving up and
//! tearing the session down. Resource wrappers and the library view sit on
//! top of that gateway.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod library;
pub mod net;
pub mod store;

#[cfg(test)]
pub(crate) mod testkit;

pub use auth::context::AuthContext;
pub use auth::navigator::Navigator;
pub use auth::session::Session;
pub use config::ClientConfig;
pub use error::{ApiError, StoreError};
pub use net::gateway::ApiClient;
pub use store::TokenStore;
