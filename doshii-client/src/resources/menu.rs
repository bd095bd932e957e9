//! Menu resource client.
//!
//! Menus are read-only and scoped to a location; the payload shape is
//! open-ended so everything comes back as `Value`.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use serde_json::Value;

pub struct MenuClient {
    http: HttpClient,
}

impl MenuClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Full menu for a location.
    pub async fn get(&self, location_id: &str) -> DoshiiResult<Value> {
        self.http.get(&format!("/locations/{location_id}/menu")).await
    }

    /// A single product by its POS id.
    pub async fn get_product(&self, location_id: &str, pos_id: &str) -> DoshiiResult<Value> {
        self.http
            .get(&format!("/locations/{location_id}/menu/products/{pos_id}"))
            .await
    }

    /// A single surcount by its POS id.
    pub async fn get_surcount(&self, location_id: &str, pos_id: &str) -> DoshiiResult<Value> {
        self.http
            .get(&format!("/locations/{location_id}/menu/surcounts/{pos_id}"))
            .await
    }
}
