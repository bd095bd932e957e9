//! Referral resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Referral;
use serde_json::Value;

pub struct ReferralClient {
    http: HttpClient,
}

impl ReferralClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Referral> {
        self.http.get(&format!("/referrals/{id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Referral>> {
        self.http.get("/referrals").await
    }

    pub async fn create(&self, referral: &Value) -> DoshiiResult<Referral> {
        self.http.post("/referrals", referral).await
    }
}
