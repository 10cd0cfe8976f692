use super::*;
use crate::net::types::{MediaType, WatchStatus};
use crate::testkit::{Harness, Reply};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn list_decodes_friends() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::GET, FRIENDS_PATH, Reply::Json(200, json!([{ "_id": "f1", "name": "Grace" }])));

    let friends = list(&h.client).await.unwrap();
    assert_eq!(friends, vec![Friend { id: "f1".into(), name: "Grace".into(), email: None }]);
}

#[tokio::test]
async fn send_request_posts_trimmed_email() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(Method::POST, FRIEND_REQUEST_PATH, Reply::Json(200, json!({ "message": "sent" })));

    send_request(&h.client, " grace@example.test ").await.unwrap();
    assert_eq!(h.transport.calls()[0].body, Some(json!({ "email": "grace@example.test" })));
}

#[tokio::test]
async fn send_request_rejects_bad_email_locally() {
    let h = Harness::logged_in("a1", "r1");
    assert!(send_request(&h.client, "grace").await.is_err());
    assert_eq!(h.transport.total(), 0);
}

#[tokio::test]
async fn activity_decodes_feed() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(
        Method::GET,
        ACTIVITY_PATH,
        Reply::Json(200, json!([{
            "user": { "id": "f1", "name": "Grace" },
            "action": "updated_status",
            "mediaTitle": "Severance",
            "mediaType": "tv",
            "status": "watching"
        }])),
    );

    let feed = activity(&h.client).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].media_type, MediaType::Tv);
    assert_eq!(feed[0].status, Some(WatchStatus::Watching));
}
