//! Table resource client.
//!
//! Tables are keyed by name, not id.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::{Booking, Checkin, Order, Table};

pub struct TableClient {
    http: HttpClient,
}

impl TableClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, name: &str) -> DoshiiResult<Table> {
        self.http.get(&format!("/tables/{name}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Table>> {
        self.http.get("/tables").await
    }

    pub async fn bookings(&self, name: &str) -> DoshiiResult<Vec<Booking>> {
        self.http.get(&format!("/tables/{name}/bookings")).await
    }

    pub async fn checkins(&self, name: &str) -> DoshiiResult<Vec<Checkin>> {
        self.http.get(&format!("/tables/{name}/checkins")).await
    }

    pub async fn orders(&self, name: &str) -> DoshiiResult<Vec<Order>> {
        self.http.get(&format!("/tables/{name}/orders")).await
    }
}
