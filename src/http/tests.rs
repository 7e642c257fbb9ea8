//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        min_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(20),
        backoff: BackoffType::Constant,
    }
}

#[test]
fn test_retry_policy_default() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries, 4);
    assert_eq!(policy.min_backoff, Duration::from_secs(3));
    assert_eq!(policy.backoff, BackoffType::Exponential);
}

#[test]
fn test_retry_policy_waits() {
    let policy = RetryPolicy {
        max_retries: 4,
        min_backoff: Duration::from_secs(3),
        max_backoff: Duration::from_secs(60),
        backoff: BackoffType::Exponential,
    };

    assert_eq!(policy.wait_for(0), Duration::from_secs(3));
    assert_eq!(policy.wait_for(1), Duration::from_secs(6));
    assert_eq!(policy.wait_for(2), Duration::from_secs(12));
    // capped at max_backoff
    assert_eq!(policy.wait_for(10), Duration::from_secs(60));

    let linear = RetryPolicy {
        backoff: BackoffType::Linear,
        ..policy
    };
    assert_eq!(linear.wait_for(1), Duration::from_secs(6));
}

#[tokio::test]
async fn test_post_json_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/import/batch"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(Some("secret".to_string()), fast_retry(0));
    let response = client
        .post_json(
            &format!("{}/v2/import/batch", mock_server.uri()),
            &json!({"messages": []}),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad payload"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(None, fast_retry(3));
    let err = client
        .post_json(&mock_server.uri(), &json!({}))
        .await
        .unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad payload");
        }
        other => panic!("expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_retries_then_surfaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(None, fast_retry(2));
    let err = client
        .post_json(&mock_server.uri(), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_server_recovers_within_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(None, fast_retry(2));
    let response = client.post_json(&mock_server.uri(), &json!({})).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
