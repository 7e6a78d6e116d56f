//! Integration tests for the catalog search coordinator against a mock CARL.X catalog.

use booklist::catalog::{CatalogError, CatalogSearcher, ErrorKind, HttpTimeouts, Query};
use booklist::PublicationInfo;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::catalog_mock::{count_body, count_mock, page, requests_to, resource, search_mock};

const AUTHOR: &str = "Grafton, Sue";
const YEAR: &str = "2024";

fn searcher() -> CatalogSearcher {
    CatalogSearcher::new().unwrap().with_current_year(YEAR)
}

fn info(media: &str, title: &str) -> PublicationInfo {
    PublicationInfo {
        media: media.to_string(),
        title: title.to_string(),
    }
}

#[tokio::test]
async fn test_search_keeps_only_exact_author_matches() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(0)).mount(&server).await;
    count_mock(YEAR, count_body(2)).mount(&server).await;
    search_mock("unknown", page(vec![]))
        .expect(0)
        .mount(&server)
        .await;
    search_mock(
        YEAR,
        page(vec![
            resource(AUTHOR, "Book", "Y is for yesterday"),
            resource("Grafton, Sue Ellen", "Book", "Not hers"),
        ]),
    )
    .expect(1)
    .mount(&server)
    .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap();

    assert_eq!(results, vec![info("Book", "Y is for yesterday")]);
    assert_eq!(requests_to(&server, "/search/count").await, 2);
}

#[tokio::test]
async fn test_search_count_failure_is_protocol_error_without_fetch() {
    let server = MockServer::start().await;

    count_mock("unknown", json!({"success": false}))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::CountUnavailable { .. }), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Protocol);
    // The current-year bucket is never reached.
    assert_eq!(requests_to(&server, "/search/count").await, 1);
}

#[tokio::test]
async fn test_search_more_results_than_count_discards_partial_results() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(1)).mount(&server).await;
    search_mock(
        "unknown",
        page(vec![
            resource(AUTHOR, "Book", "One"),
            resource(AUTHOR, "Book", "Two"),
        ]),
    )
    .mount(&server)
    .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    match &err {
        CatalogError::CountMismatch {
            year,
            expected,
            retrieved,
        } => {
            assert_eq!(year, "unknown");
            assert_eq!(*expected, 1);
            assert_eq!(*retrieved, 2);
        }
        other => panic!("expected CountMismatch, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn test_search_pages_until_expected_count_reached() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(0)).mount(&server).await;
    count_mock(YEAR, count_body(3)).mount(&server).await;
    search_mock(
        YEAR,
        page(vec![
            resource(AUTHOR, "Book", "First"),
            resource(AUTHOR, "Large Print", "Second"),
        ]),
    )
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
    search_mock(YEAR, page(vec![resource(AUTHOR, "Book", "Third")]))
        .expect(1)
        .mount(&server)
        .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![
            info("Book", "First"),
            info("Large Print", "Second"),
            info("Book", "Third"),
        ]
    );
}

#[tokio::test]
async fn test_search_orders_unknown_year_before_current_year() {
    let server = MockServer::start().await;

    count_mock(YEAR, count_body(1)).mount(&server).await;
    count_mock("unknown", count_body(1)).mount(&server).await;
    search_mock(YEAR, page(vec![resource(AUTHOR, "Book", "This year")]))
        .mount(&server)
        .await;
    search_mock("unknown", page(vec![resource(AUTHOR, "eBook", "Someday")]))
        .mount(&server)
        .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![info("eBook", "Someday"), info("Book", "This year")]
    );
}

#[tokio::test]
async fn test_search_defaults_missing_fields_and_drops_authorless() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(3)).mount(&server).await;
    count_mock(YEAR, count_body(0)).mount(&server).await;
    search_mock(
        "unknown",
        page(vec![
            json!({"shortAuthor": AUTHOR}),
            json!({"format": "Book", "shortTitle": "The Mystery Writers of America cookbook"}),
            json!({"shortAuthor": AUTHOR, "format": "DVD"}),
        ]),
    )
    .mount(&server)
    .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![info("Unknown", "Unknown"), info("DVD", "Unknown")]
    );
}

#[tokio::test]
async fn test_search_empty_author_issues_no_requests() {
    let server = MockServer::start().await;

    let err = searcher()
        .search(&Query::new(server.uri(), "", "Book"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("author"));
    assert_eq!(requests_to(&server, "/search/count").await, 0);
    assert_eq!(requests_to(&server, "/search").await, 0);
}

#[tokio::test]
async fn test_search_sends_catalog_headers_payload_and_unique_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/count"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Content-Type", "application/json; charset=utf-8"))
        .and(header("Ls2pac-config-type", "pac"))
        .and(header("Ls2pac-config-name", "default - Go Live load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(0)))
        .expect(2)
        .mount(&server)
        .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "eBook"))
        .await
        .unwrap();
    assert!(results.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let tokens: Vec<String> = requests
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == "_")
                .map(|(_, value)| value.into_owned())
                .unwrap()
        })
        .collect();
    assert_ne!(tokens[0], tokens[1], "cache-bust tokens must differ");
    assert!(tokens.iter().all(|t| t.len() == 13));

    let accept_language = requests[0]
        .headers
        .get("accept-language")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(accept_language, "en-US,en;q=0.8");

    let referer = requests[0].headers.get("referer").unwrap().to_str().unwrap();
    assert_eq!(referer, format!("{}/", server.uri()));

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["searchTerm"], AUTHOR);
    assert_eq!(body["hitsPerPage"], 30);
    assert_eq!(body["startIndex"], 0);
    assert_eq!(body["facetFilters"][0]["facetValue"], "unknown");
    assert_eq!(body["facetFilters"][1]["facetValue"], "eBook");

    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["facetFilters"][0]["facetValue"], YEAR);
}

#[tokio::test]
async fn test_search_http_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/count"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::HttpStatus { status: 500, .. }), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("/search/count"));
}

#[tokio::test]
async fn test_search_malformed_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("CountResponse"));
}

#[tokio::test]
async fn test_search_empty_page_before_expected_count_is_protocol_error() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(2)).mount(&server).await;
    search_mock("unknown", page(vec![]))
        .expect(1)
        .mount(&server)
        .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, CatalogError::StalledPaging { expected: 2, retrieved: 0, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_search_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/count"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(count_body(0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let searcher = CatalogSearcher::with_timeouts(HttpTimeouts::with_request_secs(1))
        .unwrap()
        .with_current_year(YEAR);
    let err = searcher
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Timeout { timeout_secs: 1, .. }), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_search_tolerates_null_resources_and_null_entries() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(2)).mount(&server).await;
    count_mock(YEAR, count_body(1)).mount(&server).await;
    search_mock(
        "unknown",
        json!({"resources": [null, resource(AUTHOR, "Book", "Kept")]}),
    )
    .expect(1)
    .mount(&server)
    .await;
    search_mock(YEAR, json!({"resources": null}))
        .expect(1)
        .mount(&server)
        .await;

    let err = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap_err();

    // The null entry counts toward the retrieved total; the null page stalls.
    assert!(
        matches!(err, CatalogError::StalledPaging { expected: 1, retrieved: 0, .. }),
        "got {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn test_search_skips_null_entries_in_page() {
    let server = MockServer::start().await;

    count_mock("unknown", count_body(2)).mount(&server).await;
    count_mock(YEAR, count_body(0)).mount(&server).await;
    search_mock(
        "unknown",
        json!({"resources": [null, resource(AUTHOR, "Book", "Kept")]}),
    )
    .mount(&server)
    .await;

    let results = searcher()
        .search(&Query::new(server.uri(), AUTHOR, "Book"))
        .await
        .unwrap();

    assert_eq!(results, vec![info("Book", "Kept")]);
}
