//! Integration tests for the application method set.
//!
//! Each test mounts the endpoint an operation is expected to hit and checks
//! the decoded result, so a wrong method, path or body fails the match.

use std::collections::HashMap;

use serde_json::json;
use sevalla_api::rest::resources::{
    ApplicationState, CreateApplicationRequest, ListOptions, LogOptions, Plan, Region,
    ScaleApplicationRequest, Status, UpdateApplicationRequest, UsageOptions,
};
use sevalla_api::{ApiKey, RequestContext, SevallaClient};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, SevallaClient) {
    let server = MockServer::start().await;
    let client = SevallaClient::builder()
        .base_url(format!("{}/v2/", server.uri()))
        .api_key(ApiKey::new("test-key").unwrap())
        .build()
        .unwrap();
    (server, client)
}

fn sample_app() -> serde_json::Value {
    json!({
        "id": "app-123",
        "name": "test-app",
        "state": "running",
        "repository_url": "https://github.com/user/repo",
        "branch": "main",
        "location": "us-central1",
        "pod_size": "starter",
        "replicas": 2,
        "auto_deploy": true,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn sample_deployment(id: &str, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "application_id": "app-123",
        "state": state,
        "commit_sha": "abc123"
    })
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_list_applications_with_options() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(query_param("company_id", "comp-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sample_app()])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListOptions::new().page(2).per_page(10).company_id("comp-1");
    let apps = client
        .applications()
        .list(&RequestContext::default(), Some(&options))
        .await
        .unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name, "test-app");
    assert_eq!(apps[0].state, Some(ApplicationState::Running));
}

#[tokio::test]
async fn test_list_without_options_sends_no_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let apps = client
        .applications()
        .list(&RequestContext::default(), Some(&ListOptions::new()))
        .await
        .unwrap();
    assert!(apps.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_create_application() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/applications"))
        .and(body_json(json!({
            "name": "test-app",
            "repository_url": "https://github.com/user/repo",
            "location": "us-central1",
            "pod_size": "starter"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(sample_app()))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateApplicationRequest {
        region: Some(Region::UsCentral1),
        plan: Some(Plan::Starter),
        ..CreateApplicationRequest::new("test-app", "https://github.com/user/repo")
    };
    let app = client
        .applications()
        .create(&RequestContext::default(), &request)
        .await
        .unwrap();

    assert_eq!(app.status(), 201);
    assert_eq!(app.id, "app-123");
    assert_eq!(app.region, Some(Region::UsCentral1));
}

#[tokio::test]
async fn test_update_application_uses_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/applications/app-123"))
        .and(body_json(json!({"branch": "develop"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_app()))
        .expect(1)
        .mount(&server)
        .await;

    let update = UpdateApplicationRequest {
        branch: Some("develop".to_string()),
        ..UpdateApplicationRequest::default()
    };
    client
        .applications()
        .update(&RequestContext::default(), "app-123", &update)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_application() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/applications/app-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .applications()
        .delete(&RequestContext::default(), "app-123")
        .await
        .unwrap();
    assert_eq!(response.code, 204);
}

#[tokio::test]
async fn test_identifier_is_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_app()))
        .expect(1)
        .mount(&server)
        .await;

    client
        .applications()
        .get(&RequestContext::default(), "a/b")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dot_segment_identifiers_are_rejected_before_sending() {
    let (server, client) = setup().await;
    let ctx = RequestContext::default();

    for id in [".", ".."] {
        let err = client.applications().delete(&ctx, id).await.unwrap_err();
        assert!(matches!(err, sevalla_api::Error::Validation(ref v) if v.field == "id"));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_tolerates_null_scalar_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a",
            "replicas": null,
            "auto_deploy": null,
            "name": null
        })))
        .mount(&server)
        .await;

    let app = client
        .applications()
        .get(&RequestContext::default(), "a")
        .await
        .unwrap();
    assert_eq!(app.id, "a");
    assert_eq!(app.replicas, 0);
    assert!(!app.auto_deploy);
    assert!(app.name.is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_scale_application() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/applications/app-123/scale"))
        .and(body_json(json!({"replicas": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_app()))
        .expect(1)
        .mount(&server)
        .await;

    client
        .applications()
        .scale(
            &RequestContext::default(),
            "app-123",
            &ScaleApplicationRequest {
                replicas: 0,
                plan: None,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_lifecycle_actions() {
    let (server, client) = setup().await;

    for action in ["restart", "stop", "start"] {
        Mock::given(method("POST"))
            .and(path(format!("/v2/applications/app-123/{action}")))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ctx = RequestContext::default();
    let apps = client.applications();
    assert_eq!(apps.restart(&ctx, "app-123").await.unwrap().code, 202);
    assert_eq!(apps.stop(&ctx, "app-123").await.unwrap().code, 202);
    assert_eq!(apps.start(&ctx, "app-123").await.unwrap().code, 202);
}

#[tokio::test]
async fn test_logs_with_line_limit() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-123/logs"))
        .and(query_param("lines", "100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logs": "booting\nready\n"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let logs = client
        .applications()
        .logs(&RequestContext::default(), "app-123", Some(&LogOptions::lines(100)))
        .await
        .unwrap();
    assert_eq!(logs.as_str(), "booting\nready\n");
}

// ============================================================================
// Deployments
// ============================================================================

#[tokio::test]
async fn test_deploy_application() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/applications/app-123/deployments"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(sample_deployment("dep-1", "queued")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let deployment = client
        .applications()
        .deploy(&RequestContext::default(), "app-123")
        .await
        .unwrap();
    assert_eq!(deployment.id, "dep-1");
    assert_eq!(deployment.state, Some(Status::Queued));
}

#[tokio::test]
async fn test_application_deployment_history() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-123/deployments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sample_deployment("dep-2", "success"),
            sample_deployment("dep-1", "failed")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-123/deployments/dep-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(sample_deployment("dep-2", "success")),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/applications/app-123/deployments/dep-2/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::default();
    let history = client
        .applications()
        .list_deployments(&ctx, "app-123", None)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|d| d.is_finished()));

    let deployment = client
        .applications()
        .get_deployment(&ctx, "app-123", "dep-2")
        .await
        .unwrap();
    assert_eq!(deployment.state, Some(Status::Success));

    client
        .applications()
        .cancel_deployment(&ctx, "app-123", "dep-2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rollback() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/applications/app-123/rollback/dep-1"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(sample_deployment("dep-3", "deploying")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let deployment = client
        .applications()
        .rollback(&RequestContext::default(), "app-123", "dep-1")
        .await
        .unwrap();
    assert_eq!(deployment.id, "dep-3");
}

// ============================================================================
// Domains, CDN, Environment and Usage
// ============================================================================

#[tokio::test]
async fn test_custom_domains() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/applications/app-123/domains"))
        .and(body_json(json!({"domain": "www.example.com"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/applications/app-123/domains/www.example.com"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::default();
    client
        .applications()
        .add_custom_domain(&ctx, "app-123", "www.example.com")
        .await
        .unwrap();
    client
        .applications()
        .remove_custom_domain(&ctx, "app-123", "www.example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_cdn_settings() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v2/applications/app-123/cdn"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .applications()
        .update_cdn_settings(&RequestContext::default(), "app-123", false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_environment_variables_round_trip_through_endpoints() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v2/applications/app-123/env"))
        .and(body_json(json!({"DATABASE_URL": "postgres://db"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-123/env"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"DATABASE_URL": "postgres://db"})),
        )
        .mount(&server)
        .await;

    let ctx = RequestContext::default();
    let mut variables = HashMap::new();
    variables.insert("DATABASE_URL".to_string(), "postgres://db".to_string());

    client
        .applications()
        .set_environment_variables(&ctx, "app-123", &variables)
        .await
        .unwrap();

    let fetched = client
        .applications()
        .environment_variables(&ctx, "app-123")
        .await
        .unwrap();
    assert_eq!(fetched.into_inner(), variables);
}

#[tokio::test]
async fn test_usage_with_period() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/applications/app-123/usage"))
        .and(query_param("period", "7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "application_id": "app-123",
            "period": "7d",
            "cpu_usage": 0.25,
            "memory_usage": 512.0,
            "request_count": 1200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let usage = client
        .applications()
        .usage(
            &RequestContext::default(),
            "app-123",
            Some(&UsageOptions::period("7d")),
        )
        .await
        .unwrap();
    assert_eq!(usage.period, "7d");
    assert!((usage.cpu_usage - 0.25).abs() < f64::EPSILON);
    assert_eq!(usage.request_count, 1200);
}
