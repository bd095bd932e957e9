//! Booking resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::{Booking, Checkin};
use serde_json::Value;

pub struct BookingClient {
    http: HttpClient,
}

impl BookingClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Booking> {
        self.http.get(&format!("/bookings/{id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Booking>> {
        self.http.get("/bookings").await
    }

    pub async fn create(&self, booking: &Value) -> DoshiiResult<Booking> {
        self.http.post("/bookings", booking).await
    }

    pub async fn update(&self, id: &str, booking: &Value) -> DoshiiResult<Booking> {
        self.http.put(&format!("/bookings/{id}"), booking).await
    }

    pub async fn delete(&self, id: &str) -> DoshiiResult<Value> {
        self.http.delete(&format!("/bookings/{id}")).await
    }

    /// Seat a booking, creating its checkin.
    pub async fn create_checkin(&self, id: &str, checkin: &Value) -> DoshiiResult<Checkin> {
        self.http
            .post(&format!("/bookings/{id}/checkin"), checkin)
            .await
    }
}
