//! Reviews: read per media item, write, delete.

use crate::auth::validate;
use crate::error::ApiError;
use crate::net::gateway::ApiClient;
use crate::net::types::{MediaType, NewReview, Review};

pub const REVIEWS_PATH: &str = "/api/reviews";

fn media_reviews_endpoint(media_type: MediaType, media_id: i64) -> String {
    format!("{REVIEWS_PATH}/media/{media_type}/{media_id}")
}

fn review_endpoint(id: &str) -> String {
    format!("{REVIEWS_PATH}/{id}")
}

/// # Errors
///
/// Any gateway error.
pub async fn for_media(client: &ApiClient, media_type: MediaType, media_id: i64) -> Result<Vec<Review>, ApiError> {
    client.get(&media_reviews_endpoint(media_type, media_id)).await
}

/// # Errors
///
/// `Validation` for an out-of-range rating or empty text; otherwise any
/// gateway error.
pub async fn create(client: &ApiClient, review: &NewReview) -> Result<Review, ApiError> {
    validate::rating(review.rating)?;
    if review.content.trim().is_empty() {
        return Err(ApiError::Validation("review text is required".into()));
    }
    client.post(REVIEWS_PATH, review).await
}

/// # Errors
///
/// Any gateway error.
pub async fn remove(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&review_endpoint(id)).await
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod tests;
