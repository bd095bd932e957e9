//! Transaction resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Transaction;
use serde_json::Value;

pub struct TransactionClient {
    http: HttpClient,
}

impl TransactionClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Transaction> {
        self.http.get(&format!("/transactions/{id}")).await
    }

    /// Transactions recorded against an order.
    pub async fn list_for_order(&self, order_id: &str) -> DoshiiResult<Vec<Transaction>> {
        self.http
            .get(&format!("/orders/{order_id}/transactions"))
            .await
    }

    /// Record a payment against an order.
    pub async fn create(&self, order_id: &str, transaction: &Value) -> DoshiiResult<Transaction> {
        self.http
            .post(&format!("/orders/{order_id}/transactions"), transaction)
            .await
    }

    /// Update a transaction (completion, void).
    pub async fn update(&self, id: &str, transaction: &Value) -> DoshiiResult<Transaction> {
        self.http
            .put(&format!("/transactions/{id}"), transaction)
            .await
    }
}
