//! Location resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Location;
use serde_json::Value;

pub struct LocationClient {
    http: HttpClient,
}

impl LocationClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Location> {
        self.http.get(&format!("/locations/{id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Location>> {
        self.http.get("/locations").await
    }

    /// Subscribe the application to a venue, enabling its events and orders.
    pub async fn subscribe(&self, id: &str) -> DoshiiResult<Value> {
        self.http
            .post(&format!("/locations/{id}/subscription"), &Value::Null)
            .await
    }

    pub async fn unsubscribe(&self, id: &str) -> DoshiiResult<Value> {
        self.http
            .delete(&format!("/locations/{id}/subscription"))
            .await
    }
}
