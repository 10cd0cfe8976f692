use super::*;
use crate::net::types::MediaType;
use crate::testkit::{Harness, Reply};
use reqwest::Method;
use serde_json::json;

fn item(id: &str, status: WatchStatus) -> WatchlistItem {
    WatchlistItem {
        id: id.into(),
        media_id: 603,
        media_type: MediaType::Movie,
        title: "The Matrix".into(),
        status,
        rating: None,
        notes: None,
        added_at: None,
    }
}

fn item_json(id: &str, status: &str) -> serde_json::Value {
    json!({ "id": id, "mediaId": 603, "mediaType": "movie", "title": "The Matrix", "status": status })
}

#[test]
fn item_endpoint_formats_expected_path() {
    assert_eq!(item_endpoint("w1"), "/api/watchlist/w1");
}

#[tokio::test]
async fn list_decodes_items() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::GET, WATCHLIST_PATH, Reply::Json(200, json!([item_json("w1", "watching")])));

    let items = list(&h.client).await.unwrap();
    assert_eq!(items, vec![item("w1", WatchStatus::Watching)]);
}

#[tokio::test]
async fn add_posts_camel_case_body() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::POST, WATCHLIST_PATH, Reply::Json(201, item_json("w1", "plan_to_watch")));

    let new = NewWatchlistItem {
        media_id: 603,
        media_type: MediaType::Movie,
        title: "The Matrix".into(),
        status: WatchStatus::PlanToWatch,
    };
    let created = add(&h.client, &new).await.unwrap();
    assert_eq!(created.id, "w1");
    assert_eq!(
        h.transport.calls()[0].body,
        Some(json!({ "mediaId": 603, "mediaType": "movie", "title": "The Matrix", "status": "plan_to_watch" }))
    );
}

#[tokio::test]
async fn empty_update_is_rejected_locally() {
    let h = Harness::logged_in("a1", "r1");
    let err = update(&h.client, "w1", &WatchlistUpdate::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(h.transport.total(), 0);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_locally() {
    let h = Harness::logged_in("a1", "r1");
    let change = WatchlistUpdate { rating: Some(11), ..WatchlistUpdate::default() };
    assert!(update(&h.client, "w1", &change).await.is_err());
    assert_eq!(h.transport.total(), 0);
}

#[tokio::test]
async fn allowed_transition_sends_status_only() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::PUT, "/api/watchlist/w1", Reply::Json(200, item_json("w1", "completed")));

    let updated = transition(&h.client, &item("w1", WatchStatus::Watching), WatchStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, WatchStatus::Completed);
    assert_eq!(h.transport.calls()[0].body, Some(json!({ "status": "completed" })));
}

#[tokio::test]
async fn disallowed_transition_is_rejected_locally() {
    let h = Harness::logged_in("a1", "r1");
    let err = transition(&h.client, &item("w1", WatchStatus::PlanToWatch), WatchStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("allowed: watching, dropped")));
    assert_eq!(h.transport.total(), 0);
}

#[tokio::test]
async fn remove_hits_item_endpoint() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::DELETE, "/api/watchlist/w1", Reply::Json(200, json!({ "message": "removed" })));

    remove(&h.client, "w1").await.unwrap();
    assert_eq!(h.transport.count(Method::DELETE, "/api/watchlist/w1"), 1);
}
