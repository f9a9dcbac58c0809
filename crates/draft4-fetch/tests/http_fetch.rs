//! HttpFetcher against a wiremock server.
//!
//! The fetcher blocks on its own runtime, so every call runs on a blocking
//! thread while the test runtime keeps serving the mock.

use std::time::{Duration, Instant};

use draft4_fetch::{FetchConfig, FetchError, HttpFetcher};
use draft4_schema::{CompileOptions, ReferenceError, Schema};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uri(server: &MockServer, file: &str) -> Url {
    Url::parse(&format!("{}/{file}", server.uri())).unwrap()
}

async fn fetch(config: FetchConfig, uri: Url) -> Result<Vec<u8>, FetchError> {
    tokio::task::spawn_blocking(move || HttpFetcher::new(config)?.fetch(&uri))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_returns_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integer.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "integer"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetch(FetchConfig::local_mock(), uri(&server, "integer.json"))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, json!({"type": "integer"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = FetchConfig {
        max_retries: 3,
        ..FetchConfig::local_mock()
    };
    let result = fetch(config, uri(&server, "missing.json")).await;
    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(1024)))
        .mount(&server)
        .await;

    let config = FetchConfig {
        max_document_bytes: 100,
        ..FetchConfig::local_mock()
    };
    let result = fetch(config, uri(&server, "big.json")).await;
    assert!(matches!(result, Err(FetchError::TooLarge { limit: 100, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = FetchConfig {
        timeout_secs: 1,
        ..FetchConfig::local_mock()
    };
    let result = fetch(config, uri(&server, "slow.json")).await;
    assert!(matches!(result, Err(FetchError::Http { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_aborts_an_in_flight_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let config = FetchConfig {
        timeout_secs: 30,
        ..FetchConfig::local_mock()
    };
    let fetcher = tokio::task::spawn_blocking(move || HttpFetcher::new(config))
        .await
        .unwrap()
        .unwrap();
    let handle = fetcher.cancel_handle();
    let target = uri(&server, "slow.json");

    let started = Instant::now();
    let task = tokio::task::spawn_blocking(move || fetcher.fetch(&target));
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.cancel();
    let result = task.await.unwrap();

    assert!(matches!(result, Err(FetchError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn schema_follows_http_references() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subSchemas.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "integer": {"type": "integer"},
            "refToInteger": {"$ref": "#/integer"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/subSchemas.json", server.uri());
    let (valid, invalid, errors) = tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(FetchConfig::local_mock()).unwrap();
        let options = CompileOptions::new().allow_external(true).with_retriever(&fetcher);
        let schema = Schema::compile_with(
            &json!({
                "properties": {
                    "a": {"$ref": format!("{base}#/integer")},
                    "b": {"$ref": format!("{base}#/refToInteger")}
                }
            }),
            &options,
        )
        .unwrap();
        (
            schema.is_valid(&json!({"a": 1, "b": 2})),
            schema.is_valid(&json!({"b": "two"})),
            schema.reference_errors().to_vec(),
        )
    })
    .await
    .unwrap();

    assert!(valid);
    assert!(!invalid);
    assert!(errors.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_reference_fails_only_its_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let target = format!("{}/down.json", server.uri());
    let errors = tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(FetchConfig::local_mock()).unwrap();
        let options = CompileOptions::new().allow_external(true).with_retriever(&fetcher);
        let schema = Schema::compile_with(
            &json!({"properties": {"remote": {"$ref": target}, "local": {"type": "string"}}}),
            &options,
        )
        .unwrap();
        assert!(schema.is_valid(&json!({"local": "x"})));
        assert!(!schema.is_valid(&json!({"remote": 1})));
        schema.reference_errors().to_vec()
    })
    .await
    .unwrap();

    assert!(matches!(errors.as_slice(), [ReferenceError::Fetch { .. }]));
}
