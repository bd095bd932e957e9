//! Transport abstraction for the event channel.
//!
//! The channel manager talks to the wire through the [`SocketTransport`]
//! trait so that tests (and in-process setups) can substitute a channel-backed
//! transport for the real WebSocket.

use crate::error::{DoshiiError, DoshiiResult};
use async_trait::async_trait;
use doshii_types::frame::{FrameError, SocketFrame};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// One live connection. Owned exclusively by the channel manager.
#[async_trait]
pub trait SocketTransport: Send {
    /// Read the next decoded frame.
    ///
    /// Frames that fail to decode (including unknown event kinds) are skipped
    /// with a log line; only connection-fatal conditions surface as errors.
    async fn read(&mut self) -> DoshiiResult<SocketFrame>;

    /// Send a frame.
    async fn write(&mut self, frame: &SocketFrame) -> DoshiiResult<()>;

    /// Close the connection. Best effort.
    async fn close(&mut self);
}

/// Opens connections. The manager calls this once per (re)connection attempt.
#[async_trait]
pub trait SocketConnector: Send + Sync {
    async fn connect(&self, url: &str) -> DoshiiResult<Box<dyn SocketTransport>>;
}

// ============================================================================
// WebSocket transport
// ============================================================================

/// Real WebSocket transport.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl SocketTransport for WsTransport {
    async fn read(&mut self) -> DoshiiResult<SocketFrame> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => match SocketFrame::decode(&text) {
                    Ok(frame) => return Ok(frame),
                    Err(FrameError::UnknownKind(kind)) => {
                        tracing::debug!("Skipping event of unknown kind: {kind}");
                    }
                    Err(e) => {
                        tracing::warn!("Skipping undecodable frame: {e}");
                    }
                },
                Some(Ok(Message::Close(_))) => {
                    return Err(DoshiiError::Channel("server closed connection".to_string()));
                }
                // Protocol-level ping/pong and binary frames are not part of
                // the envelope protocol; tungstenite answers pings itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(DoshiiError::Channel(format!("socket read failed: {e}")));
                }
                None => {
                    return Err(DoshiiError::Channel("socket stream ended".to_string()));
                }
            }
        }
    }

    async fn write(&mut self, frame: &SocketFrame) -> DoshiiResult<()> {
        self.stream
            .send(Message::Text(frame.encode()))
            .await
            .map_err(|e| DoshiiError::Channel(format!("socket write failed: {e}")))
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Connector producing [`WsTransport`] connections.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

#[async_trait]
impl SocketConnector for WsConnector {
    async fn connect(&self, url: &str) -> DoshiiResult<Box<dyn SocketTransport>> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| DoshiiError::Channel(format!("socket connect failed: {e}")))?;
        Ok(Box::new(WsTransport { stream }))
    }
}

// ============================================================================
// Memory transport (in-process / tests)
// ============================================================================

/// Channel-backed transport for in-process use and tests.
pub struct MemoryTransport {
    inbound: mpsc::UnboundedReceiver<SocketFrame>,
    outbound: mpsc::UnboundedSender<SocketFrame>,
    /// When set, each outbound ping is answered with a pong on `inbound`.
    /// Holding this sender keeps the read stream open, so sessions scripted
    /// without ping answering are the ones that can observe a disconnect.
    pong_responder: Option<mpsc::UnboundedSender<SocketFrame>>,
}

#[async_trait]
impl SocketTransport for MemoryTransport {
    async fn read(&mut self) -> DoshiiResult<SocketFrame> {
        self.inbound
            .recv()
            .await
            .ok_or_else(|| DoshiiError::Channel("memory transport closed".to_string()))
    }

    async fn write(&mut self, frame: &SocketFrame) -> DoshiiResult<()> {
        if *frame == SocketFrame::Ping {
            if let Some(ref responder) = self.pong_responder {
                let _ = responder.send(SocketFrame::Pong {
                    timestamp: chrono::Utc::now().timestamp_millis(),
                });
            }
        }
        self.outbound
            .send(frame.clone())
            .map_err(|_| DoshiiError::Channel("memory transport peer gone".to_string()))
    }

    async fn close(&mut self) {
        self.inbound.close();
    }
}

/// Test-side handle for one scripted connection.
pub struct MemorySession {
    to_client: mpsc::UnboundedSender<SocketFrame>,
    from_client: mpsc::UnboundedReceiver<SocketFrame>,
}

impl MemorySession {
    /// Push a frame to the client as if the server sent it.
    pub fn emit(&self, frame: SocketFrame) {
        let _ = self.to_client.send(frame);
    }

    /// Next frame the client wrote, if any has arrived.
    pub async fn next_outbound(&mut self) -> Option<SocketFrame> {
        self.from_client.recv().await
    }

    /// Drop the server side, which ends the client's read stream.
    pub fn disconnect(self) {}
}

/// Connector that hands out pre-scripted [`MemoryTransport`] sessions in
/// order. Once the script is exhausted, further connection attempts fail.
#[derive(Default)]
pub struct MemoryConnector {
    sessions: Mutex<VecDeque<MemoryTransport>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a session. Returns the server-side handle.
    ///
    /// When `answer_pings` is set the transport responds to each outbound
    /// ping with a pong, keeping the heartbeat alive without test plumbing.
    pub fn script_session(&self, answer_pings: bool) -> MemorySession {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let transport = MemoryTransport {
            inbound,
            outbound,
            pong_responder: answer_pings.then(|| to_client.clone()),
        };
        self.sessions
            .lock()
            .expect("session script lock poisoned")
            .push_back(transport);
        MemorySession {
            to_client,
            from_client,
        }
    }
}

#[async_trait]
impl SocketConnector for MemoryConnector {
    async fn connect(&self, _url: &str) -> DoshiiResult<Box<dyn SocketTransport>> {
        let next = self
            .sessions
            .lock()
            .expect("session script lock poisoned")
            .pop_front();
        match next {
            Some(transport) => Ok(Box::new(transport)),
            None => Err(DoshiiError::Channel(
                "no scripted session available".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doshii_types::EventKind;

    #[tokio::test]
    async fn memory_transport_round_trip() {
        let connector = MemoryConnector::new();
        let session = connector.script_session(false);
        let mut transport = connector.connect("mem://test").await.unwrap();

        session.emit(SocketFrame::Event {
            kind: EventKind::TableUpdated,
            payload: serde_json::json!({ "name": "T1" }),
        });
        let frame = transport.read().await.unwrap();
        assert!(matches!(frame, SocketFrame::Event { kind, .. } if kind == EventKind::TableUpdated));
    }

    #[tokio::test]
    async fn memory_transport_answers_pings_when_scripted() {
        let connector = MemoryConnector::new();
        let mut session = connector.script_session(true);
        let mut transport = connector.connect("mem://test").await.unwrap();

        transport.write(&SocketFrame::Ping).await.unwrap();
        assert_eq!(session.next_outbound().await, Some(SocketFrame::Ping));
        assert!(matches!(
            transport.read().await.unwrap(),
            SocketFrame::Pong { .. }
        ));
    }

    #[tokio::test]
    async fn exhausted_script_refuses_connections() {
        let connector = MemoryConnector::new();
        assert!(connector.connect("mem://test").await.is_err());
    }

    #[tokio::test]
    async fn disconnect_ends_the_read_stream() {
        let connector = MemoryConnector::new();
        let session = connector.script_session(false);
        let mut transport = connector.connect("mem://test").await.unwrap();

        session.disconnect();
        assert!(transport.read().await.is_err());
    }
}
