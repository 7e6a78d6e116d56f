//! Mock CARL.X catalog helpers.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches search POSTs whose `Year` facet has the given value.
pub struct YearFacet(pub String);

impl Match for YearFacet {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return false;
        };
        body["facetFilters"]
            .as_array()
            .into_iter()
            .flatten()
            .any(|facet| facet["facetName"] == "Year" && facet["facetValue"] == self.0.as_str())
    }
}

pub fn count_body(total_hits: u64) -> Value {
    json!({"success": true, "totalHits": total_hits})
}

pub fn resource(author: &str, format: &str, title: &str) -> Value {
    json!({"shortAuthor": author, "format": format, "shortTitle": title})
}

pub fn page(resources: Vec<Value>) -> Value {
    json!({"resources": resources})
}

pub fn count_mock(year: impl Into<String>, body: Value) -> Mock {
    Mock::given(method("POST"))
        .and(path("/search/count"))
        .and(YearFacet(year.into()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

pub fn search_mock(year: impl Into<String>, body: Value) -> Mock {
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(YearFacet(year.into()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

/// Counts received requests to `request_path`.
pub async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
