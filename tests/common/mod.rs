//! Shared fixtures for the integration tests.

use kintone_connector::objects::GuardedString;
use kintone_connector::transport::{HttpRequest, HttpResponse, Method, MockTransport};
use kintone_connector::{ConnectorConfig, KintoneConnector};
use serde_json::{Value, json};

pub const BASE_URL: &str = "https://example.cybozu.com";

/// Full URL of an API path, e.g. `url("users.json")`.
pub fn url(path: &str) -> String {
    format!("{}/v1/{}", BASE_URL, path)
}

pub fn test_config() -> ConnectorConfig {
    ConnectorConfig::new(BASE_URL, "admin", GuardedString::new("secret"))
}

pub fn connector(mock: &MockTransport) -> KintoneConnector<MockTransport> {
    connector_with(mock, test_config())
}

pub fn connector_with(
    mock: &MockTransport,
    config: ConnectorConfig,
) -> KintoneConnector<MockTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    KintoneConnector::new(config, mock.clone()).expect("valid test configuration")
}

pub fn ok() -> HttpResponse {
    HttpResponse::new(200, "{}")
}

pub fn records(collection: &str, list: Value) -> HttpResponse {
    HttpResponse::json(200, &json!({ (collection): list }))
}

/// A 400 validation error on the code field of `collection`.
pub fn code_error(collection: &str, message: &str) -> HttpResponse {
    HttpResponse::json(
        400,
        &json!({
            "code": "CB_VA01",
            "id": "error-id",
            "message": "Invalid input.",
            "errors": { (format!("{}.code", collection)): { "messages": [message] } }
        }),
    )
}

/// Answer a lookup by code with one record.
pub async fn respond_to_code(mock: &MockTransport, collection: &str, code: &str, record: Value) {
    mock.respond_to_query(
        Method::Get,
        &url(&format!("{}.json", collection)),
        &[("codes", code)],
        records(collection, json!([record])),
    )
    .await;
}

/// Method and path of each captured request, in order.
pub fn calls(requests: &[HttpRequest]) -> Vec<(Method, String)> {
    requests
        .iter()
        .map(|r| {
            let path = r.url.trim_start_matches(&url(""));
            (r.method, path.to_string())
        })
        .collect()
}

/// Value of a query parameter of a captured request.
pub fn query<'a>(request: &'a HttpRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
