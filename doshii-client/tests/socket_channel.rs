//! End-to-end tests for the event channel over the in-memory transport.

use doshii_client::socket::MemoryConnector;
use doshii_client::{DoshiiClient, DoshiiConfig, EventKind, ReconnectPolicy, SocketFrame};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn test_client(connector: Arc<MemoryConnector>) -> DoshiiClient {
    init_tracing();
    let config = DoshiiConfig::sandbox("test-app", "test-secret")
        .with_socket_url("mem://socket")
        .with_heartbeat_interval(Duration::from_millis(50))
        .with_correlation_timeout(Duration::from_secs(2))
        .with_reconnect(ReconnectPolicy {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
        });
    DoshiiClient::with_connector(config, connector).expect("client should build")
}

async fn recv_within(
    sub: &mut doshii_client::Subscription,
    dur: Duration,
) -> Option<doshii_client::DoshiiEvent> {
    tokio::time::timeout(dur, sub.recv()).await.ok().flatten()
}

#[tokio::test]
async fn subscribed_kind_is_delivered_exactly_once() {
    let connector = Arc::new(MemoryConnector::new());
    let session = connector.script_session(true);
    let client = test_client(connector.clone());

    let mut sub = client
        .subscribe(&[EventKind::OrderUpdated])
        .await
        .expect("subscribe should succeed");

    // Raw wire shape, decoded the way the channel would see it.
    let frame = SocketFrame::decode(r#"{"emit":["order_updated",{"id":"42"}]}"#)
        .expect("frame should decode");
    session.emit(frame);

    let event = recv_within(&mut sub, Duration::from_secs(2))
        .await
        .expect("event should be delivered");
    assert_eq!(event.kind, EventKind::OrderUpdated);
    assert_eq!(event.payload, json!({ "id": "42" }));

    // Exactly once: nothing further arrives.
    assert!(
        recv_within(&mut sub, Duration::from_millis(200)).await.is_none(),
        "event must not be delivered twice"
    );
}

#[tokio::test]
async fn fan_out_respects_each_subscriber_kinds() {
    let connector = Arc::new(MemoryConnector::new());
    let session = connector.script_session(true);
    let client = test_client(connector.clone());

    let mut orders = client.subscribe(&[EventKind::OrderUpdated]).await.unwrap();
    let mut tables = client.subscribe(&[EventKind::TableUpdated]).await.unwrap();
    let mut both = client
        .subscribe(&[EventKind::OrderUpdated, EventKind::TableUpdated])
        .await
        .unwrap();

    session.emit(SocketFrame::Event {
        kind: EventKind::OrderUpdated,
        payload: json!({ "id": "1" }),
    });

    assert!(recv_within(&mut orders, Duration::from_secs(2)).await.is_some());
    assert!(recv_within(&mut both, Duration::from_secs(2)).await.is_some());
    assert!(
        recv_within(&mut tables, Duration::from_millis(200)).await.is_none(),
        "table subscriber must not see order events"
    );
}

#[tokio::test]
async fn missed_heartbeat_triggers_transparent_reconnect() {
    let connector = Arc::new(MemoryConnector::new());
    // First session never answers pings; the liveness check must tear it
    // down and the channel must come back on the second session.
    let _dead = connector.script_session(false);
    let live = connector.script_session(true);
    let client = test_client(connector.clone());

    let mut sub = client.subscribe(&[EventKind::OrderUpdated]).await.unwrap();

    // Buffered in the second session; only readable once reconnected.
    live.emit(SocketFrame::Event {
        kind: EventKind::OrderUpdated,
        payload: json!({ "id": "7", "status": "accepted" }),
    });

    let event = recv_within(&mut sub, Duration::from_secs(5))
        .await
        .expect("delivery should survive the reconnect");
    assert_eq!(event.payload["id"], "7");
    assert!(client.is_connected());
}

#[tokio::test]
async fn unsubscribe_all_stops_delivery() {
    let connector = Arc::new(MemoryConnector::new());
    let session = connector.script_session(true);
    let client = test_client(connector.clone());

    let mut sub = client.subscribe(&[EventKind::OrderCreated]).await.unwrap();
    session.emit(SocketFrame::Event {
        kind: EventKind::OrderCreated,
        payload: json!({ "id": "a" }),
    });
    assert!(recv_within(&mut sub, Duration::from_secs(2)).await.is_some());

    client.unsubscribe(sub.id(), None).await.unwrap();
    // recv returns None once the registry drops the sender.
    let closed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if sub.recv().await.is_none() {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "subscription should close after unsubscribe");

    session.emit(SocketFrame::Event {
        kind: EventKind::OrderCreated,
        payload: json!({ "id": "b" }),
    });
    assert!(recv_within(&mut sub, Duration::from_millis(200)).await.is_none());
}
