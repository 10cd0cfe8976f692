//! Movie/TV metadata search and details, proxied by the server.

use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::transport::ApiRequest;
use crate::net::types::{Media, MediaType, SearchResults};

pub const SEARCH_PATH: &str = "/api/media/search";

fn details_endpoint(media_type: MediaType, id: i64) -> String {
    format!("/api/media/{media_type}/{id}")
}

/// Search metadata by title.
///
/// # Errors
///
/// `Validation` for a blank query; otherwise any gateway error.
pub async fn search(
    client: &ApiClient,
    query: &str,
    media_type: Option<MediaType>,
    page: u32,
) -> Result<SearchResults, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation("search query is required".into()));
    }

    let mut request = ApiRequest::get(SEARCH_PATH)
        .with_query("query", query)
        .with_query("page", page.max(1).to_string());
    if let Some(kind) = media_type {
        request = request.with_query("type", kind.as_str());
    }
    client.send_json(request).await
}

/// # Errors
///
/// Any gateway error; `Status { status: 404, .. }` for unknown ids.
pub async fn details(client: &ApiClient, media_type: MediaType, id: i64) -> Result<Media, ApiError> {
    client.get(&details_endpoint(media_type, id)).await
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
