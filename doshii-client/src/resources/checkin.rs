//! Checkin resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::{Checkin, Order};
use serde_json::Value;

pub struct CheckinClient {
    http: HttpClient,
}

impl CheckinClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Checkin> {
        self.http.get(&format!("/checkins/{id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Checkin>> {
        self.http.get("/checkins").await
    }

    pub async fn create(&self, checkin: &Value) -> DoshiiResult<Checkin> {
        self.http.post("/checkins", checkin).await
    }

    pub async fn update(&self, id: &str, checkin: &Value) -> DoshiiResult<Checkin> {
        self.http.put(&format!("/checkins/{id}"), checkin).await
    }

    /// Orders placed under this checkin.
    pub async fn orders(&self, id: &str) -> DoshiiResult<Vec<Order>> {
        self.http.get(&format!("/checkins/{id}/orders")).await
    }
}
