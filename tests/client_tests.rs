//! Integration tests for the request builder and response pipeline.
//!
//! These tests run the client against a local mock server and verify
//! authentication headers, error classification, empty-body handling,
//! pagination and rate limit parsing, deadlines and cancellation.

use std::time::Duration;

use serde_json::json;
use sevalla_api::rest::resources::Application;
use sevalla_api::{ApiKey, CancellationToken, Error, HttpMethod, RequestContext, SevallaClient};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a mock server and a client pointed at its `/v2/` prefix.
async fn setup() -> (MockServer, SevallaClient) {
    let server = MockServer::start().await;
    let client = SevallaClient::builder()
        .base_url(format!("{}/v2/", server.uri()))
        .api_key(ApiKey::new("test-key").unwrap())
        .build()
        .unwrap();
    (server, client)
}

// ============================================================================
// Request Building
// ============================================================================

#[tokio::test]
async fn test_requests_carry_auth_and_default_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-1"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Accept", "application/json"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "app-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = client
        .applications()
        .get(&RequestContext::default(), "app-1")
        .await
        .unwrap();
    assert_eq!(app.id, "app-1");
}

#[tokio::test]
async fn test_client_without_key_sends_no_authorization() {
    let server = MockServer::start().await;
    let client = SevallaClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/deployments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client
        .deployments()
        .list(&RequestContext::default(), None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .headers
        .iter()
        .all(|(name, _)| !name.as_str().eq_ignore_ascii_case("authorization")));
}

#[tokio::test]
async fn test_custom_user_agent_is_sent() {
    let server = MockServer::start().await;
    let client = SevallaClient::builder()
        .base_url(server.uri())
        .user_agent("deploy-bot/2.0")
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/pipelines"))
        .and(header("User-Agent", "deploy-bot/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client
        .pipelines()
        .list(&RequestContext::default(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_json_body_is_sent_with_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/custom"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"html": "<b>&</b>"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = client
        .http()
        .new_request_with_body(HttpMethod::Post, "custom", &json!({"html": "<b>&</b>"}))
        .unwrap();
    let response = client
        .http()
        .execute(&RequestContext::default(), request)
        .await
        .unwrap();
    assert_eq!(response.code, 204);
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_not_found_decodes_structured_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Request-Id", "req-404")
                .set_body_json(json!({
                    "message": "Application not found",
                    "code": "not_found"
                })),
        )
        .mount(&server)
        .await;

    let err = client
        .applications()
        .get(&RequestContext::default(), "missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.is_client_error());
    assert!(!err.is_server_error());
    assert_eq!(err.status(), Some(404));

    let api = err.api_error().unwrap();
    assert_eq!(api.message, "Application not found");
    assert_eq!(api.code.as_deref(), Some("not_found"));
    assert_eq!(api.request_id.as_deref(), Some("req-404"));
    assert_eq!(
        err.to_string(),
        "sevalla: not_found (404) - Application not found"
    );
}

#[tokio::test]
async fn test_validation_error_with_field_details() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/databases"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation failed",
            "errors": [
                {"field": "name", "code": "required", "message": "is required"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .databases()
        .create(
            &RequestContext::default(),
            &sevalla_api::rest::resources::CreateDatabaseRequest::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_unprocessable_entity());
    let api = err.api_error().unwrap();
    assert_eq!(api.errors.len(), 1);
    assert_eq!(api.errors[0].field, "name");
    assert_eq!(api.errors[0].code, "required");
}

#[tokio::test]
async fn test_non_json_error_body_becomes_message() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/pipelines/p-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client
        .pipelines()
        .delete(&RequestContext::default(), "p-1")
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert!(!err.is_client_error());
    let api = err.api_error().unwrap();
    assert_eq!(api.message, "Bad Gateway");
    assert!(api.code.is_none());
    assert_eq!(err.to_string(), "sevalla: 502 - Bad Gateway");
}

#[tokio::test]
async fn test_rate_limited_carries_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .insert_header("X-RateLimit-Limit", "100")
                .insert_header("X-RateLimit-Remaining", "0")
                .set_body_json(json!({"message": "Too many requests"})),
        )
        .mount(&server)
        .await;

    let err = client
        .applications()
        .list(&RequestContext::default(), None)
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert!(err.is_client_error());
    match &err {
        Error::RateLimited(limit) => {
            assert_eq!(limit.retry_after, Some(Duration::from_secs(30)));
            assert_eq!(limit.error.response.rate.limit, 100);
            assert_eq!(limit.error.response.rate.remaining, 0);
        }
        other => panic!("Expected RateLimited, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "rate limited: retry after 30 seconds - Too many requests"
    );
}

#[tokio::test]
async fn test_transport_failure_is_not_an_api_error() {
    let client = SevallaClient::builder()
        .base_url("http://127.0.0.1:1/")
        .build()
        .unwrap();

    let err = client
        .applications()
        .list(&RequestContext::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.api_error().is_none());
    assert!(!err.is_not_found());
    assert!(!err.is_client_error());
    assert!(!err.is_server_error());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_empty_identifier_is_rejected_without_a_request() {
    let (server, client) = setup().await;

    let err = client
        .applications()
        .get(&RequestContext::default(), "")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ref v) if v.field == "id"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Response Bodies
// ============================================================================

#[tokio::test]
async fn test_no_content_yields_default_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let app = client
        .applications()
        .get(&RequestContext::default(), "app-1")
        .await
        .unwrap();
    assert_eq!(app.status(), 204);
    assert_eq!(*app, Application::default());
}

#[tokio::test]
async fn test_empty_success_body_is_not_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/anything"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = client
        .http()
        .new_request(HttpMethod::Get, "anything")
        .unwrap();
    let response = client
        .http()
        .execute_json::<serde_json::Value>(&RequestContext::default(), request)
        .await
        .unwrap();
    assert!(response.is_none());
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_execute_into_leaves_destination_on_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut destination = vec![1, 2, 3];
    let request = client.http().new_request(HttpMethod::Get, "empty").unwrap();
    client
        .http()
        .execute_into(&RequestContext::default(), request, &mut destination)
        .await
        .unwrap();
    assert_eq!(destination, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error_with_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "req-bad")
                .set_body_string("{not json"),
        )
        .mount(&server)
        .await;

    let err = client
        .applications()
        .get(&RequestContext::default(), "app-1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.api_error().is_none());
    let response = err.response().unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.request_id(), Some("req-bad"));
}

#[tokio::test]
async fn test_execute_to_writer_copies_body_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line one\nline two\n"))
        .mount(&server)
        .await;

    let mut buffer = Vec::new();
    let request = client.http().new_request(HttpMethod::Get, "export").unwrap();
    let response = client
        .http()
        .execute_to_writer(&RequestContext::default(), request, &mut buffer)
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(buffer, b"line one\nline two\n");
}

#[tokio::test]
async fn test_execute_to_writer_does_not_write_error_bodies() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/export"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let mut buffer = Vec::new();
    let request = client.http().new_request(HttpMethod::Get, "export").unwrap();
    let err = client
        .http()
        .execute_to_writer(&RequestContext::default(), request, &mut buffer)
        .await
        .unwrap_err();

    assert!(err.is_forbidden());
    assert!(buffer.is_empty());
}

// ============================================================================
// Pagination and Rate Limits
// ============================================================================

#[tokio::test]
async fn test_link_header_and_rate_headers_are_parsed() {
    let (server, client) = setup().await;
    let link = format!(
        "<{0}/v2/applications?page=3>; rel=\"next\", <{0}/v2/applications?page=1>; rel=\"prev\", \
         <{0}/v2/applications?page=1>; rel=\"first\", <{0}/v2/applications?page=9>; rel=\"last\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/v2/applications"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", link.as_str())
                .insert_header("X-RateLimit-Limit", "1000")
                .insert_header("X-RateLimit-Remaining", "998")
                .insert_header("X-RateLimit-Reset", "1700000000")
                .set_body_json(json!([{"id": "a"}, {"id": "b"}])),
        )
        .mount(&server)
        .await;

    let apps = client
        .applications()
        .list(&RequestContext::default(), None)
        .await
        .unwrap();

    assert_eq!(apps.len(), 2);
    assert!(apps.has_next_page());
    assert_eq!(apps.next_page(), 3);
    let pagination = apps.pagination();
    assert_eq!(pagination.prev_page, 1);
    assert_eq!(pagination.first_page, 1);
    assert_eq!(pagination.last_page, 9);

    let rate = apps.rate();
    assert_eq!(rate.limit, 1000);
    assert_eq!(rate.remaining, 998);
    assert_eq!(rate.reset.map(|r| r.timestamp()), Some(1_700_000_000));
}

#[tokio::test]
async fn test_missing_headers_leave_zero_values() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/static-sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let sites = client
        .static_sites()
        .list(&RequestContext::default(), None)
        .await
        .unwrap();

    assert!(!sites.has_next_page());
    assert_eq!(sites.next_page(), 0);
    assert_eq!(sites.rate().limit, 0);
    assert!(sites.rate().reset.is_none());
}

// ============================================================================
// Deadlines and Cancellation
// ============================================================================

#[tokio::test]
async fn test_context_deadline_returns_timeout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));
    let err = client.applications().list(&ctx, None).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
    assert!(err.is_timeout());
    assert!(err.api_error().is_none());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/databases"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let (token, receiver) = CancellationToken::new();
    let ctx = RequestContext::new().with_cancellation(receiver);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = client.databases().list(&ctx, None).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_already_cancelled_context_sends_nothing() {
    let (server, client) = setup().await;

    let (token, receiver) = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::new().with_cancellation(receiver);

    let err = client.pipelines().list(&ctx, None).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(server.received_requests().await.unwrap().is_empty());
}
