//! Session lifecycle: bootstrap, login/register/logout, and the login redirect.

pub mod context;
pub mod navigator;
pub mod session;
pub mod validate;
