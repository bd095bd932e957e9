//! Loyalty resource client.
//!
//! Covers member management plus the response half of redemption flows:
//! point/reward redemption requests arrive as events, and the integrator
//! accepts or declines them through these calls.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::LoyaltyMember;
use serde_json::Value;

pub struct LoyaltyClient {
    http: HttpClient,
}

impl LoyaltyClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_member(&self, id: &str) -> DoshiiResult<LoyaltyMember> {
        self.http.get(&format!("/loyalty/members/{id}")).await
    }

    pub async fn list_members(&self) -> DoshiiResult<Vec<LoyaltyMember>> {
        self.http.get("/loyalty/members").await
    }

    pub async fn create_member(&self, member: &Value) -> DoshiiResult<LoyaltyMember> {
        self.http.post("/loyalty/members", member).await
    }

    pub async fn update_member(&self, id: &str, member: &Value) -> DoshiiResult<LoyaltyMember> {
        self.http.put(&format!("/loyalty/members/{id}"), member).await
    }

    pub async fn delete_member(&self, id: &str) -> DoshiiResult<Value> {
        self.http.delete(&format!("/loyalty/members/{id}")).await
    }

    /// Answer a points-redemption request received as an event.
    pub async fn respond_points_redemption(
        &self,
        redemption_id: &str,
        response: &Value,
    ) -> DoshiiResult<Value> {
        self.http
            .put(
                &format!("/loyalty/pointsRedemption/{redemption_id}"),
                response,
            )
            .await
    }

    /// Answer a reward-redemption request received as an event.
    pub async fn respond_reward_redemption(
        &self,
        redemption_id: &str,
        response: &Value,
    ) -> DoshiiResult<Value> {
        self.http
            .put(
                &format!("/loyalty/rewardRedemption/{redemption_id}"),
                response,
            )
            .await
    }
}
