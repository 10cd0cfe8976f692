//! Personal watchlist: list, add, update, remove, and status transitions.

use crate::auth::validate;
use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::types::{NewWatchlistItem, WatchStatus, WatchlistItem, WatchlistUpdate};

pub const WATCHLIST_PATH: &str = "/api/watchlist";

fn item_endpoint(id: &str) -> String {
    format!("{WATCHLIST_PATH}/{id}")
}

/// # Errors
///
/// Any gateway error.
pub async fn list(client: &ApiClient) -> Result<Vec<WatchlistItem>, ApiError> {
    client.get(WATCHLIST_PATH).await
}

/// # Errors
///
/// `Validation` for a blank title; otherwise any gateway error.
pub async fn add(client: &ApiClient, item: &NewWatchlistItem) -> Result<WatchlistItem, ApiError> {
    if item.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    client.post(WATCHLIST_PATH, item).await
}

/// Send a partial update. Does not check status transitions; see [`transition`].
///
/// # Errors
///
/// `Validation` for an empty update or an out-of-range rating; otherwise any
/// gateway error.
pub async fn update(client: &ApiClient, id: &str, update: &WatchlistUpdate) -> Result<WatchlistItem, ApiError> {
    if update.status.is_none() && update.rating.is_none() && update.notes.is_none() {
        return Err(ApiError::Validation("nothing to update".into()));
    }
    if let Some(rating) = update.rating {
        validate::rating(rating)?;
    }
    client.put(&item_endpoint(id), update).await
}

/// Move an item to a new status if the transition is allowed.
///
/// # Errors
///
/// `Validation` if `to` is not reachable from the item's current status.
pub async fn transition(client: &ApiClient, item: &WatchlistItem, to: WatchStatus) -> Result<WatchlistItem, ApiError> {
    if !item.status.can_transition_to(to) {
        let allowed: Vec<&str> = item.status.next().iter().map(|s| s.as_str()).collect();
        return Err(ApiError::Validation(format!(
            "cannot move '{}' from {} to {} (allowed: {})",
            item.title,
            item.status,
            to,
            allowed.join(", ")
        )));
    }
    tracing::debug!(item_id = %item.id, from = %item.status, to = %to, "watch status transition");
    let change = WatchlistUpdate { status: Some(to), ..WatchlistUpdate::default() };
    update(client, &item.id, &change).await
}

/// # Errors
///
/// Any gateway error.
pub async fn remove(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&item_endpoint(id)).await
}

#[cfg(test)]
#[path = "watchlist_test.rs"]
mod tests;
