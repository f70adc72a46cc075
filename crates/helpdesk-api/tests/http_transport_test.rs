#![allow(clippy::unwrap_used)]
// Integration tests for `HttpTransport` using wiremock.
//
// The transport is blocking, so every call runs inside `spawn_blocking`
// while the mock server lives on the async test runtime.

use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpdesk_api::{ApiResponse, Credentials, Error, HttpTransport, Transport, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials() -> Credentials {
    Credentials::new("agent@example.com", "s3cret".to_owned().into())
}

fn url(server: &MockServer, suffix: &str) -> Url {
    Url::parse(&format!("{}{suffix}", server.uri())).unwrap()
}

/// Build the transport and run `f` on a blocking thread.
async fn run_blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&HttpTransport) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(credentials(), &TransportConfig::default()).unwrap();
        f(&transport)
    })
    .await
    .unwrap()
}

// ── Success paths ───────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sends_token_auth_and_parses_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/1.json"))
        .and(basic_auth("agent@example.com/token", "s3cret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ticket": { "id": 1 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets/1.json");
    let resp = run_blocking(move |t| t.get(&target)).await.unwrap();

    assert_eq!(
        resp,
        ApiResponse {
            status: 200,
            body: json!({ "ticket": { "id": 1 } }),
        }
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    let payload = json!({ "ticket": { "subject": "Printer on fire" } });

    Mock::given(method("POST"))
        .and(path("/api/v2/tickets.json"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ticket": { "id": 9 } })))
        .expect(1)
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets.json");
    let resp = run_blocking(move |t| t.post(&target, &payload)).await.unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.body["ticket"]["id"], 9);
}

#[tokio::test]
async fn test_put_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/users/3.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 3 } })))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/users/3.json");
    let resp = run_blocking(move |t| t.put(&target, &json!({ "user": { "name": "Ada" } })))
        .await
        .unwrap();

    assert_eq!(resp.body["user"]["id"], 3);
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_status() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/tickets/4.json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets/4.json");
    let status = run_blocking(move |t| t.delete(&target)).await.unwrap();

    assert_eq!(status, 204);
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_json_error_body_is_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/404.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "RecordNotFound",
            "description": "Not found"
        })))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets/404.json");
    let result = run_blocking(move |t| t.get(&target)).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("RecordNotFound"), "message: {message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets.json");
    let result = run_blocking(move |t| t.get(&target)).await;

    assert!(
        matches!(result, Err(Error::Http { status: 502, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/users/me.json");
    let result = run_blocking(move |t| t.get(&target)).await;

    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_delete_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "Invalid" })))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets/1.json");
    let result = run_blocking(move |t| t.delete(&target)).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_invalid_json_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let target = url(&server, "/api/v2/tickets.json");
    let result: Result<ApiResponse, Error> = run_blocking(move |t| t.get(&target)).await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}
