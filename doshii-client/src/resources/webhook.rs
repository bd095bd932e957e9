//! Webhook resource client.
//!
//! Webhooks are the HTTP alternative to the socket channel for event
//! delivery; one registration per event kind.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Webhook;
use serde_json::Value;

pub struct WebhookClient {
    http: HttpClient,
}

impl WebhookClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, event: &str) -> DoshiiResult<Webhook> {
        self.http.get(&format!("/webhooks/{event}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Webhook>> {
        self.http.get("/webhooks").await
    }

    pub async fn create(&self, webhook: &Webhook) -> DoshiiResult<Webhook> {
        self.http.post("/webhooks", webhook).await
    }

    pub async fn update(&self, event: &str, webhook: &Webhook) -> DoshiiResult<Webhook> {
        self.http.put(&format!("/webhooks/{event}"), webhook).await
    }

    pub async fn delete(&self, event: &str) -> DoshiiResult<Value> {
        self.http.delete(&format!("/webhooks/{event}")).await
    }
}
