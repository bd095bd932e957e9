//! Device resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Device;
use serde_json::Value;

pub struct DeviceClient {
    http: HttpClient,
}

impl DeviceClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, doshii_id: &str) -> DoshiiResult<Device> {
        self.http.get(&format!("/devices/{doshii_id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Device>> {
        self.http.get("/devices").await
    }

    pub async fn register(&self, device: &Value) -> DoshiiResult<Device> {
        self.http.post("/devices", device).await
    }

    pub async fn update(&self, doshii_id: &str, device: &Value) -> DoshiiResult<Device> {
        self.http.put(&format!("/devices/{doshii_id}"), device).await
    }

    pub async fn unregister(&self, doshii_id: &str) -> DoshiiResult<Value> {
        self.http.delete(&format!("/devices/{doshii_id}")).await
    }
}
