//! Event channel manager.
//!
//! A background task owns the connection and runs the lifecycle state
//! machine: Disconnected → Connecting → Connected → Backoff. The public
//! [`EventChannel`] handle talks to it over a command channel.
//!
//! Transport failures are never surfaced to subscribers; the task retries
//! indefinitely with exponential backoff. Liveness is probed with a ping
//! every heartbeat interval; a missing pong by the next tick tears the
//! connection down and re-enters backoff.

use crate::auth::TokenProvider;
use crate::config::{DoshiiConfig, ReconnectPolicy};
use crate::error::{DoshiiError, DoshiiResult};
use crate::socket::correlator::Correlator;
use crate::socket::registry::{DoshiiEvent, SubscriberId, SubscriptionRegistry};
use crate::socket::transport::{SocketConnector, SocketTransport};
use doshii_types::{EventKind, SocketFrame};
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Capacity of each subscriber's event channel.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 256;

/// Connection settings the channel task needs.
#[derive(Debug, Clone)]
pub(crate) struct ChannelConfig {
    pub socket_url: String,
    pub heartbeat_interval: Duration,
    pub reconnect: ReconnectPolicy,
    pub close_when_idle: bool,
}

impl ChannelConfig {
    pub(crate) fn from_config(config: &DoshiiConfig) -> Self {
        Self {
            socket_url: config.socket_base_url(),
            heartbeat_interval: config.heartbeat_interval,
            reconnect: config.reconnect.clone(),
            close_when_idle: config.close_when_idle,
        }
    }
}

/// Commands sent from the public API to the channel task.
enum ChannelCmd {
    Subscribe {
        kinds: Vec<EventKind>,
        event_tx: mpsc::Sender<DoshiiEvent>,
        result_tx: oneshot::Sender<SubscriberId>,
    },
    Unsubscribe {
        id: SubscriberId,
        kinds: Option<Vec<EventKind>>,
    },
    /// Ensure the task is connecting (used by the order-correlation path).
    Start,
    Shutdown,
}

/// One subscriber's stream of decoded events.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<DoshiiEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next event, or `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<DoshiiEvent> {
        self.rx.recv().await
    }
}

/// Handle to the real-time event channel.
///
/// Dropping the handle shuts the background task down.
pub struct EventChannel {
    cmd_tx: mpsc::Sender<ChannelCmd>,
    connected: Arc<AtomicBool>,
    reconnect_attempts: Arc<AtomicU32>,
    correlator: Correlator,
    _task: JoinHandle<()>,
}

impl EventChannel {
    /// Spawn the channel task. The connection itself is established lazily on
    /// the first subscribe (or explicit [`start`](Self::start)).
    pub(crate) fn spawn(
        config: ChannelConfig,
        connector: Arc<dyn SocketConnector>,
        tokens: TokenProvider,
        correlator: Correlator,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let connected = Arc::new(AtomicBool::new(false));
        let reconnect_attempts = Arc::new(AtomicU32::new(0));

        let task = tokio::spawn(channel_task(
            cmd_rx,
            config,
            connector,
            tokens,
            correlator.clone(),
            connected.clone(),
            reconnect_attempts.clone(),
        ));

        Self {
            cmd_tx,
            connected,
            reconnect_attempts,
            correlator,
            _task: task,
        }
    }

    /// Subscribe to the given event kinds.
    ///
    /// Side effect: brings the connection up if it was down.
    pub async fn subscribe(&self, kinds: &[EventKind]) -> DoshiiResult<Subscription> {
        let (event_tx, event_rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let (result_tx, result_rx) = oneshot::channel();

        self.cmd_tx
            .send(ChannelCmd::Subscribe {
                kinds: kinds.to_vec(),
                event_tx,
                result_tx,
            })
            .await
            .map_err(|_| DoshiiError::Channel("channel task is not running".to_string()))?;

        let id = result_rx
            .await
            .map_err(|_| DoshiiError::Channel("channel task dropped the subscribe".to_string()))?;

        Ok(Subscription { id, rx: event_rx })
    }

    /// Remove the given kinds from a subscriber; `None` removes all.
    pub async fn unsubscribe(
        &self,
        id: SubscriberId,
        kinds: Option<Vec<EventKind>>,
    ) -> DoshiiResult<()> {
        self.cmd_tx
            .send(ChannelCmd::Unsubscribe { id, kinds })
            .await
            .map_err(|_| DoshiiError::Channel("channel task is not running".to_string()))
    }

    /// Bring the connection up without subscribing.
    pub async fn start(&self) -> DoshiiResult<()> {
        self.cmd_tx
            .send(ChannelCmd::Start)
            .await
            .map_err(|_| DoshiiError::Channel("channel task is not running".to_string()))
    }

    /// Gracefully shut the channel down.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(ChannelCmd::Shutdown).await;
    }

    /// Whether the socket is currently open and authenticated.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Reconnection attempts since the last successful connect.
    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts.load(Ordering::Relaxed)
    }

    pub(crate) fn correlator(&self) -> &Correlator {
        &self.correlator
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        // Best-effort shutdown signal.
        let _ = self.cmd_tx.try_send(ChannelCmd::Shutdown);
    }
}

// ============================================================================
// Background task
// ============================================================================

/// Add up to 25% random jitter to a backoff delay.
fn jittered(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    let jitter = rand::thread_rng().gen_range(0..=ms / 4);
    Duration::from_millis(ms + jitter)
}

/// Route one event to the correlator and the subscriber registry.
fn dispatch_event(
    kind: EventKind,
    payload: Value,
    registry: &mut SubscriptionRegistry,
    correlator: &Correlator,
) {
    if kind.is_order_event() {
        if let Some(id) = payload.get("id").and_then(Value::as_str) {
            if correlator.resolve(id, payload.clone()) {
                tracing::debug!("Resolved pending operation for order {id}");
            }
        }
    }

    let delivered = registry.dispatch(kind, &payload);
    tracing::trace!("Dispatched {kind} to {delivered} subscriber(s)");
}

/// The state machine. One instance per client; owns the transport, the
/// subscriber registry, and all reconnection behavior.
async fn channel_task(
    mut cmd_rx: mpsc::Receiver<ChannelCmd>,
    config: ChannelConfig,
    connector: Arc<dyn SocketConnector>,
    tokens: TokenProvider,
    correlator: Correlator,
    connected: Arc<AtomicBool>,
    reconnect_attempts: Arc<AtomicU32>,
) {
    let mut registry = SubscriptionRegistry::new();
    let mut transport: Option<Box<dyn SocketTransport>> = None;
    let mut want_connection = false;
    let mut shutdown = false;
    let mut awaiting_pong = false;
    // Delay to serve before the next connection attempt (the Backoff state).
    let mut next_delay: Option<Duration> = None;
    let mut heartbeat = tokio::time::interval_at(
        Instant::now() + config.heartbeat_interval,
        config.heartbeat_interval,
    );

    loop {
        if shutdown {
            if let Some(mut t) = transport.take() {
                t.close().await;
            }
            connected.store(false, Ordering::SeqCst);
            tracing::debug!("Event channel task shut down");
            return;
        }

        if transport.is_some() {
            // ── Connected ──
            let mut lost_connection = false;
            let mut close_now = false;
            {
                let Some(t) = transport.as_mut() else {
                    continue;
                };
                tokio::select! {
                    biased;

                    cmd = cmd_rx.recv() => match cmd {
                        Some(ChannelCmd::Subscribe { kinds, event_tx, result_tx }) => {
                            let id = registry.add(&kinds, event_tx);
                            let _ = result_tx.send(id);
                        }
                        Some(ChannelCmd::Unsubscribe { id, kinds }) => {
                            registry.remove(id, kinds.as_deref());
                            if config.close_when_idle
                                && registry.is_empty()
                                && correlator.is_empty()
                            {
                                tracing::info!("Last subscriber left, closing event channel");
                                want_connection = false;
                                close_now = true;
                            }
                        }
                        Some(ChannelCmd::Start) => {}
                        Some(ChannelCmd::Shutdown) | None => shutdown = true,
                    },

                    _ = heartbeat.tick() => {
                        if awaiting_pong {
                            tracing::warn!("Heartbeat not acknowledged within interval, reconnecting");
                            lost_connection = true;
                        } else if let Err(e) = t.write(&SocketFrame::Ping).await {
                            tracing::warn!("Heartbeat send failed: {e}");
                            lost_connection = true;
                        } else {
                            awaiting_pong = true;
                        }
                    }

                    frame = t.read() => match frame {
                        Ok(SocketFrame::Pong { timestamp }) => {
                            tracing::trace!("Heartbeat acknowledged (server ts {timestamp})");
                            awaiting_pong = false;
                        }
                        Ok(SocketFrame::Ping) => {
                            // The server does not probe us; nothing to do.
                        }
                        Ok(SocketFrame::Event { kind, payload }) => {
                            dispatch_event(kind, payload, &mut registry, &correlator);
                        }
                        Err(e) => {
                            tracing::warn!("Connection lost: {e}");
                            lost_connection = true;
                        }
                    },
                }
            }

            if lost_connection {
                transport = None;
                connected.store(false, Ordering::SeqCst);
                awaiting_pong = false;
                let attempt = reconnect_attempts.fetch_add(1, Ordering::SeqCst);
                let delay = jittered(config.reconnect.delay_for_attempt(attempt));
                tracing::debug!("Backing off {:?} before reconnecting", delay);
                next_delay = Some(delay);
            } else if close_now {
                if let Some(mut t) = transport.take() {
                    t.close().await;
                }
                connected.store(false, Ordering::SeqCst);
                awaiting_pong = false;
            }
        } else if want_connection {
            // ── Backoff / Connecting ──
            if let Some(delay) = next_delay.take() {
                // Serve the backoff delay, staying responsive to commands.
                let sleep = tokio::time::sleep(delay);
                tokio::pin!(sleep);
                loop {
                    tokio::select! {
                        biased;
                        cmd = cmd_rx.recv() => match cmd {
                            Some(ChannelCmd::Subscribe { kinds, event_tx, result_tx }) => {
                                let id = registry.add(&kinds, event_tx);
                                let _ = result_tx.send(id);
                            }
                            Some(ChannelCmd::Unsubscribe { id, kinds }) => {
                                registry.remove(id, kinds.as_deref());
                                if config.close_when_idle
                                    && registry.is_empty()
                                    && correlator.is_empty()
                                {
                                    want_connection = false;
                                    break;
                                }
                            }
                            Some(ChannelCmd::Start) => {}
                            Some(ChannelCmd::Shutdown) | None => {
                                shutdown = true;
                                break;
                            }
                        },
                        _ = &mut sleep => break,
                    }
                }
                continue;
            }

            match connect_once(&config, &connector, &tokens).await {
                Ok(t) => {
                    tracing::info!("Event channel connected");
                    transport = Some(t);
                    connected.store(true, Ordering::SeqCst);
                    reconnect_attempts.store(0, Ordering::SeqCst);
                    awaiting_pong = false;
                    heartbeat = tokio::time::interval_at(
                        Instant::now() + config.heartbeat_interval,
                        config.heartbeat_interval,
                    );
                }
                Err(e) => {
                    let attempt = reconnect_attempts.fetch_add(1, Ordering::SeqCst);
                    let delay = jittered(config.reconnect.delay_for_attempt(attempt));
                    tracing::warn!(
                        "Connection attempt {} failed ({e}), retrying in {:?}",
                        attempt + 1,
                        delay
                    );
                    next_delay = Some(delay);
                }
            }
        } else {
            // ── Disconnected ──
            match cmd_rx.recv().await {
                Some(ChannelCmd::Subscribe {
                    kinds,
                    event_tx,
                    result_tx,
                }) => {
                    let id = registry.add(&kinds, event_tx);
                    let _ = result_tx.send(id);
                    want_connection = true;
                }
                Some(ChannelCmd::Unsubscribe { id, kinds }) => {
                    registry.remove(id, kinds.as_deref());
                }
                Some(ChannelCmd::Start) => want_connection = true,
                Some(ChannelCmd::Shutdown) | None => shutdown = true,
            }
        }
    }
}

/// One connection attempt: issue a fresh token and open the socket.
async fn connect_once(
    config: &ChannelConfig,
    connector: &Arc<dyn SocketConnector>,
    tokens: &TokenProvider,
) -> DoshiiResult<Box<dyn SocketTransport>> {
    let token = tokens.issue_token()?;
    let url = format!("{}?auth={}", config.socket_url, token);
    connector.connect(&url).await
}
