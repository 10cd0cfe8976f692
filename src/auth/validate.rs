//! Local input checks. Failures here never reach the network.

use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// # Errors
///
/// Returns `Validation` unless `email` has exactly one `@` with text on both sides.
pub fn email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ApiError::Validation("email must look like name@example.com".into()));
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return Err(ApiError::Validation("email must look like name@example.com".into()));
    }
    Ok(())
}

/// # Errors
///
/// Returns `Validation` for a malformed email or an empty password.
pub fn login(email_addr: &str, password: &str) -> Result<(), ApiError> {
    email(email_addr)?;
    if password.is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }
    Ok(())
}

/// # Errors
///
/// Returns `Validation` for a blank name, malformed email, or short password.
pub fn registration(name: &str, email_addr: &str, password: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    email(email_addr)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// # Errors
///
/// Returns `Validation` if `rating` is outside 1..=10.
pub fn rating(rating: u8) -> Result<(), ApiError> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "rating must be between {} and {}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )))
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
