use super::*;
use crate::testkit::{Harness, Reply};
use reqwest::Method;
use serde_json::json;

#[test]
fn details_endpoint_formats_expected_path() {
    assert_eq!(details_endpoint(MediaType::Tv, 1396), "/api/media/tv/1396");
    assert_eq!(details_endpoint(MediaType::Movie, 603), "/api/media/movie/603");
}

#[tokio::test]
async fn search_sends_query_page_and_type() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(
        Method::GET,
        SEARCH_PATH,
        Reply::Json(200, json!({
            "results": [{ "id": 438_631, "title": "Dune", "mediaType": "movie", "voteAverage": 7.8 }],
            "page": 1,
            "totalPages": 3
        })),
    );

    let results = search(&h.client, "  dune ", Some(MediaType::Movie), 0).await.unwrap();
    assert_eq!(results.results.len(), 1);
    assert_eq!(results.results[0].title, "Dune");
    assert_eq!(results.total_pages, 3);

    let call = &h.transport.calls()[0];
    assert_eq!(
        call.query,
        vec![
            ("query".to_owned(), "dune".to_owned()),
            ("page".to_owned(), "1".to_owned()),
            ("type".to_owned(), "movie".to_owned()),
        ]
    );
    assert_eq!(call.bearer.as_deref(), Some("a1"));
}

#[tokio::test]
async fn blank_search_is_rejected_locally() {
    let h = Harness::logged_in("a1", "r1");
    let err = search(&h.client, "   ", None, 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(h.transport.total(), 0);
}

#[tokio::test]
async fn details_decodes_media() {
    let h = Harness::logged_in("a1", "r1");
    h.transport.on(
        Method::GET,
        "/api/media/tv/1396",
        Reply::Json(200, json!({ "id": 1396, "title": "Breaking Bad", "mediaType": "tv", "releaseDate": "2008-01-20" })),
    );

    let media = details(&h.client, MediaType::Tv, 1396).await.unwrap();
    assert_eq!(media.media_type, MediaType::Tv);
    assert_eq!(media.release_date.as_deref(), Some("2008-01-20"));
}

#[tokio::test]
async fn unknown_media_is_status_error() {
    let h = Harness::logged_in("a1", "r1");
    let err = details(&h.client, MediaType::Movie, 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}
