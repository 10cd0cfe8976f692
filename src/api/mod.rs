//! Resource endpoints. Every call goes through the authenticated gateway.
//!
//! Path builders are plain functions so the URL shapes are testable without
//! a transport.

pub mod friends;
pub mod media;
pub mod reviews;
pub mod watchlist;
