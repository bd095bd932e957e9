//! End-to-end tests for the order-creation correlation path: POST against a
//! stub HTTP server, confirmation event over the in-memory socket.

use doshii_client::socket::MemoryConnector;
use doshii_client::{DoshiiClient, DoshiiConfig, DoshiiError, EventKind, SocketFrame};
use doshii_types::OrderCreate;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn test_client(
    api_url: &str,
    correlation_timeout: Duration,
    connector: Arc<MemoryConnector>,
) -> DoshiiClient {
    init_tracing();
    let config = DoshiiConfig::sandbox("test-app", "test-secret")
        .with_api_url(api_url)
        .with_socket_url("mem://socket")
        .with_heartbeat_interval(Duration::from_millis(500))
        .with_correlation_timeout(correlation_timeout);
    DoshiiClient::with_connector(config, connector).expect("client should build")
}

#[tokio::test]
async fn create_and_wait_resolves_with_the_event_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "status": "pending",
            "type": "dinein"
        })))
        .mount(&server)
        .await;

    let connector = Arc::new(MemoryConnector::new());
    let session = connector.script_session(true);
    let client = test_client(&server.uri(), Duration::from_secs(5), connector.clone()).await;

    // The confirmation arrives after the POST has returned and the pending
    // key is registered.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        session.emit(SocketFrame::Event {
            kind: EventKind::OrderUpdated,
            payload: json!({ "id": "42", "status": "accepted" }),
        });
        // Keep the server side alive until the test is done.
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let payload = client
        .orders()
        .create_and_wait(&OrderCreate::new("dinein"))
        .await
        .expect("confirmation event should resolve the creation");
    assert_eq!(payload["id"], "42");
    assert_eq!(payload["status"], "accepted");
    assert!(client.is_connected());
}

#[tokio::test]
async fn create_and_wait_times_out_without_a_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "77",
            "status": "pending",
            "type": "pickup"
        })))
        .mount(&server)
        .await;

    let connector = Arc::new(MemoryConnector::new());
    let _session = connector.script_session(true);
    let client = test_client(&server.uri(), Duration::from_millis(200), connector.clone()).await;

    match client
        .orders()
        .create_and_wait(&OrderCreate::new("pickup"))
        .await
    {
        Err(DoshiiError::CorrelationTimeout(key)) => assert_eq!(key, "77"),
        other => panic!("expected correlation timeout, got {other:?}"),
    }

    // The provisional order itself is still retrievable via plain create.
    let order = client
        .orders()
        .create(&OrderCreate::new("pickup"))
        .await
        .expect("plain creation should succeed");
    assert_eq!(order.id, "77");
}
