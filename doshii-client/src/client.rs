//! Top-level client.
//!
//! One [`DoshiiClient`] per application: it owns the configuration, the
//! token provider, the HTTP client, and the event channel, and hands out
//! resource clients that share them.

use crate::auth::TokenProvider;
use crate::config::DoshiiConfig;
use crate::error::DoshiiResult;
use crate::http::HttpClient;
use crate::resources::{
    BookingClient, CheckinClient, DeviceClient, EmployeeClient, LocationClient, LoyaltyClient,
    MenuClient, OrderClient, ReferralClient, TableClient, TransactionClient, WebhookClient,
};
use crate::socket::manager::ChannelConfig;
use crate::socket::{
    Correlator, EventChannel, SocketConnector, SubscriberId, Subscription, WsConnector,
};
use doshii_types::EventKind;
use std::sync::Arc;

/// Client for the POS integration platform.
///
/// # Example
///
/// ```no_run
/// use doshii_client::{DoshiiClient, DoshiiConfig};
/// use doshii_types::EventKind;
///
/// # async fn run() -> doshii_client::DoshiiResult<()> {
/// let client = DoshiiClient::new(
///     DoshiiConfig::sandbox("my-client-id", "my-client-secret").with_vendor("my-pos"),
/// )?;
///
/// let mut orders = client.subscribe(&[EventKind::OrderUpdated]).await?;
/// while let Some(event) = orders.recv().await {
///     println!("order update: {}", event.payload);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DoshiiClient {
    config: DoshiiConfig,
    http: HttpClient,
    channel: Arc<EventChannel>,
}

impl DoshiiClient {
    /// Create a client connecting to the configured environment.
    pub fn new(config: DoshiiConfig) -> DoshiiResult<Self> {
        Self::with_connector(config, Arc::new(WsConnector))
    }

    /// Create a client with a custom socket connector (testing, in-process).
    pub fn with_connector(
        config: DoshiiConfig,
        connector: Arc<dyn SocketConnector>,
    ) -> DoshiiResult<Self> {
        let tokens = TokenProvider::new(config.client_id.clone(), &config.client_secret);
        let http = HttpClient::new(&config, tokens.clone())?;
        let channel = EventChannel::spawn(
            ChannelConfig::from_config(&config),
            connector,
            tokens,
            Correlator::new(),
        );

        Ok(Self {
            config,
            http,
            channel: Arc::new(channel),
        })
    }

    pub fn config(&self) -> &DoshiiConfig {
        &self.config
    }

    // ── Event channel ──

    /// Subscribe to real-time events of the given kinds.
    ///
    /// Brings the socket up on first use; delivery survives reconnections.
    pub async fn subscribe(&self, kinds: &[EventKind]) -> DoshiiResult<Subscription> {
        self.channel.subscribe(kinds).await
    }

    /// Remove event kinds from a subscriber; `None` removes it entirely.
    pub async fn unsubscribe(
        &self,
        id: SubscriberId,
        kinds: Option<Vec<EventKind>>,
    ) -> DoshiiResult<()> {
        self.channel.unsubscribe(id, kinds).await
    }

    /// Whether the event channel is currently connected.
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Close the event channel. REST calls keep working.
    pub async fn shutdown(&self) {
        self.channel.shutdown().await;
    }

    // ── Resource clients ──

    pub fn orders(&self) -> OrderClient {
        OrderClient::new(
            self.http.clone(),
            self.channel.clone(),
            self.config.correlation_timeout,
        )
    }

    pub fn bookings(&self) -> BookingClient {
        BookingClient::new(self.http.clone())
    }

    pub fn checkins(&self) -> CheckinClient {
        CheckinClient::new(self.http.clone())
    }

    pub fn devices(&self) -> DeviceClient {
        DeviceClient::new(self.http.clone())
    }

    pub fn employees(&self) -> EmployeeClient {
        EmployeeClient::new(self.http.clone())
    }

    pub fn locations(&self) -> LocationClient {
        LocationClient::new(self.http.clone())
    }

    pub fn loyalty(&self) -> LoyaltyClient {
        LoyaltyClient::new(self.http.clone())
    }

    pub fn menu(&self) -> MenuClient {
        MenuClient::new(self.http.clone())
    }

    pub fn referrals(&self) -> ReferralClient {
        ReferralClient::new(self.http.clone())
    }

    pub fn tables(&self) -> TableClient {
        TableClient::new(self.http.clone())
    }

    pub fn transactions(&self) -> TransactionClient {
        TransactionClient::new(self.http.clone())
    }

    pub fn webhooks(&self) -> WebhookClient {
        WebhookClient::new(self.http.clone())
    }
}
