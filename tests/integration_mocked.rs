/// Integration tests with a mocked Cloudflare API
/// Exercises the live input client without hitting the real service
use axum::http::StatusCode;
use std::time::Duration;
use stream_status_proxy::cloudflare_client::CloudflareStreamClient;
use stream_status_proxy::config::Config;
use stream_status_proxy::errors::ProxyError;
use stream_status_proxy::models::UNKNOWN_STATUS;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE_INPUT_PATH: &str = "/accounts/acc123/stream/live_inputs/input456";

/// Helper function to create test config
fn create_test_config(base_url: String) -> Config {
    Config {
        port: 3000,
        account_id: "acc123".to_string(),
        live_input_id: "input456".to_string(),
        cloudflare_email: "ops@example.com".to_string(),
        cloudflare_api_key: "test_key".to_string(),
        cloudflare_api_base_url: base_url,
        upstream_timeout_secs: 5,
    }
}

async fn mount_live_input(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LIVE_INPUT_PATH))
        .respond_with(response)
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_active_stream_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIVE_INPUT_PATH))
        .and(header("X-Auth-Email", "ops@example.com"))
        .and(header("X-Auth-Key", "test_key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "errors": [],
            "result": {"uid": "input456", "status": "active"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CloudflareStreamClient::new(&create_test_config(mock_server.uri())).unwrap();
    let status = client.fetch_stream_status().await.unwrap();

    assert_eq!(status.status, "active");
}

#[tokio::test]
async fn test_missing_status_reports_unknown() {
    for body in [
        serde_json::json!({"result": {}}),
        serde_json::json!({"result": null}),
        serde_json::json!({"success": true}),
    ] {
        let mock_server = MockServer::start().await;
        mount_live_input(&mock_server, ResponseTemplate::new(200).set_body_json(&body)).await;

        let client = CloudflareStreamClient::new(&create_test_config(mock_server.uri())).unwrap();
        let status = client.fetch_stream_status().await.unwrap();

        assert_eq!(status.status, UNKNOWN_STATUS, "body: {}", body);
    }
}

#[tokio::test]
async fn test_upstream_forbidden() {
    let mock_server = MockServer::start().await;
    mount_live_input(
        &mock_server,
        ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}]
        })),
    )
    .await;

    let client = CloudflareStreamClient::new(&create_test_config(mock_server.uri())).unwrap();
    let result = client.fetch_stream_status().await;

    assert_eq!(result, Err(ProxyError::UpstreamRejection(StatusCode::FORBIDDEN)));
}

#[tokio::test]
async fn test_malformed_body_is_transport_fault() {
    let mock_server = MockServer::start().await;
    mount_live_input(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
    )
    .await;

    let client = CloudflareStreamClient::new(&create_test_config(mock_server.uri())).unwrap();
    let result = client.fetch_stream_status().await;

    match result {
        Err(ProxyError::TransportFault(msg)) => assert!(!msg.is_empty()),
        other => panic!("Expected transport fault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_fault() {
    // Nothing listens on port 1
    let client =
        CloudflareStreamClient::new(&create_test_config("http://127.0.0.1:1".to_string()))
            .unwrap();
    let result = client.fetch_stream_status().await;

    assert!(matches!(result, Err(ProxyError::TransportFault(_))));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIVE_INPUT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": {"status": "active"}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(mock_server.uri());
    config.upstream_timeout_secs = 1;
    let client = CloudflareStreamClient::new(&config).unwrap();

    let result = client.fetch_stream_status().await;
    assert!(matches!(result, Err(ProxyError::TransportFault(_))));
}

#[tokio::test]
async fn test_identifiers_substituted_verbatim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": {"status": "idle"}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(mock_server.uri());
    config.account_id = "acc-01_~.x".to_string();
    config.live_input_id = "input!$*+,=:@".to_string();
    let client = CloudflareStreamClient::new(&config).unwrap();

    let status = client.fetch_stream_status().await.unwrap();
    assert_eq!(status.status, "idle");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/accounts/acc-01_~.x/stream/live_inputs/input!$*+,=:@"
    );
    assert_eq!(requests[0].headers["x-auth-email"], "ops@example.com");
    assert_eq!(requests[0].headers["x-auth-key"], "test_key");
    assert_eq!(requests[0].headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_concurrent_lookups_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIVE_INPUT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": {"status": "active"}})),
        )
        .expect(10)
        .mount(&mock_server)
        .await;

    let client = CloudflareStreamClient::new(&create_test_config(mock_server.uri())).unwrap();

    let mut handles = vec![];
    for _ in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(
            async move { client.fetch_stream_status().await },
        ));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert_eq!(result.unwrap().status, "active");
    }
}
