//! Redirect-to-login side effect.
//!
//! A forced logout ends in "send the user back to the login entry point".
//! What that means depends on the front end, so it is a trait.

/// Login entry point the session falls back to.
pub const LOGIN_ROUTE: &str = "/login";

pub trait Navigator: Send + Sync {
    /// Abandon whatever the user was doing and show the login entry point.
    fn redirect_to_login(&self);
}
