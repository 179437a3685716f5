use std::time::Duration;

use api_claim::{ProxyError, WebhooksApiClient, dtos::claim::PreviewRequest};
use common::env_config::WebhooksApiConfig;
use reqwest::StatusCode;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn preview() -> PreviewRequest {
    PreviewRequest {
        url: "https://acme.example".to_string(),
    }
}

#[tokio::test]
async fn slow_upstream_times_out_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/previews"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = WebhooksApiClient::new(server.uri(), Duration::from_millis(1));
    let err = client.create_preview(&preview(), None).await.unwrap_err();
    assert!(
        matches!(err, ProxyError::Timeout { after } if after == Duration::from_millis(1)),
        "expected a timeout, got {err:?}"
    );
}

#[tokio::test]
async fn configured_timeout_bounds_each_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/previews"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = WebhooksApiClient::from_config(&WebhooksApiConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(20),
    });
    let err = client.create_preview(&preview(), None).await.unwrap_err();
    assert!(
        matches!(err, ProxyError::Timeout { after } if after == Duration::from_millis(20)),
        "expected a timeout, got {err:?}"
    );
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = WebhooksApiClient::new(uri, Duration::from_secs(5));
    let err = client.create_preview(&preview(), None).await.unwrap_err();
    assert!(matches!(err, ProxyError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn caller_cancellation_ends_the_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let client = WebhooksApiClient::new(server.uri(), Duration::from_secs(10));
    let err = client
        .create_preview(&preview(), Some(&token))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Cancelled));
}

#[tokio::test]
async fn non_success_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/previews/prv_1/claim"))
        .and(header("authorization", "Bearer user_token"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Already yours" })))
        .mount(&server)
        .await;

    let client = WebhooksApiClient::new(server.uri(), Duration::from_secs(5));
    let response = client
        .claim_preview("prv_1", "user_token", None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json().unwrap()["message"], "Already yours");
}

#[tokio::test]
async fn preview_request_forwards_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/previews"))
        .and(body_json(json!({ "url": "https://acme.example" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "prv_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhooksApiClient::new(format!("{}/", server.uri()), Duration::from_secs(5));
    let response = client.create_preview(&preview(), None).await.unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
}
