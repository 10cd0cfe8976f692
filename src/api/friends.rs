//! Friends list, friend requests, and the friends activity feed.

use serde::Serialize;
use serde_json::Value;

use crate::auth::validate;
use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::types::{Friend, FriendActivity};

pub const FRIENDS_PATH: &str = "/api/friends";
pub const FRIEND_REQUEST_PATH: &str = "/api/friends/request";
pub const ACTIVITY_PATH: &str = "/api/friends/activity";

#[derive(Debug, Serialize)]
struct FriendRequest<'a> {
    email: &'a str,
}

/// # Errors
///
/// Any gateway error.
pub async fn list(client: &ApiClient) -> Result<Vec<Friend>, ApiError> {
    client.get(FRIENDS_PATH).await
}

/// # Errors
///
/// `Validation` for a malformed email; otherwise any gateway error.
pub async fn send_request(client: &ApiClient, email: &str) -> Result<(), ApiError> {
    validate::email(email)?;
    client
        .post::<_, Option<Value>>(FRIEND_REQUEST_PATH, &FriendRequest { email: email.trim() })
        .await?;
    Ok(())
}

/// Recent activity from friends, newest first as the server orders it.
///
/// # Errors
///
/// Any gateway error.
pub async fn activity(client: &ApiClient) -> Result<Vec<FriendActivity>, ApiError> {
    client.get(ACTIVITY_PATH).await
}

#[cfg(test)]
#[path = "friends_test.rs"]
mod tests;
