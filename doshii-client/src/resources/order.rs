//! Order resource client.
//!
//! Order creation is a two-phase exchange: the POST returns a provisional
//! order carrying the server-assigned id, and the authoritative result
//! arrives later as an event on the socket. [`OrderClient::create_and_wait`]
//! bridges the two by registering the id with the correlator before the
//! confirmation event can possibly be missed.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use crate::socket::EventChannel;
use doshii_types::{Order, OrderCreate};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct OrderClient {
    http: HttpClient,
    channel: Arc<EventChannel>,
    correlation_timeout: Duration,
}

impl OrderClient {
    pub(crate) fn new(
        http: HttpClient,
        channel: Arc<EventChannel>,
        correlation_timeout: Duration,
    ) -> Self {
        Self {
            http,
            channel,
            correlation_timeout,
        }
    }

    /// Retrieve one order.
    pub async fn get(&self, id: &str) -> DoshiiResult<Order> {
        self.http.get(&format!("/orders/{id}")).await
    }

    /// List orders.
    pub async fn list(&self) -> DoshiiResult<Vec<Order>> {
        self.http.get("/orders").await
    }

    /// List orders filtered by status.
    pub async fn list_by_status(&self, status: &str) -> DoshiiResult<Vec<Order>> {
        self.http
            .get_with_query("/orders", &[("status", status)])
            .await
    }

    /// Create an order. Returns the provisional order from the synchronous
    /// response; the terminal status arrives later as an event.
    pub async fn create(&self, order: &OrderCreate) -> DoshiiResult<Order> {
        self.http.post("/orders", order).await
    }

    /// Create an order and wait for its confirmation event.
    ///
    /// The provisional order id is registered with the correlator as soon as
    /// the synchronous response arrives, then this call suspends until the
    /// matching order event is dispatched (or the correlation timeout fires).
    /// Returns the event payload, which carries the authoritative status.
    pub async fn create_and_wait(&self, order: &OrderCreate) -> DoshiiResult<Value> {
        // The event can only be observed over a live channel.
        self.channel.start().await?;

        let created: Order = self.create(order).await?;
        let pending = self.channel.correlator().register(&created.id)?;

        tracing::debug!("Awaiting confirmation event for order {}", created.id);
        pending.wait(self.correlation_timeout).await
    }

    /// Update an order (status transitions, item changes).
    pub async fn update(&self, id: &str, body: &Value) -> DoshiiResult<Order> {
        self.http.put(&format!("/orders/{id}"), body).await
    }
}
