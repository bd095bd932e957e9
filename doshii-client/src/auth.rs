//! Auth token provider.
//!
//! Every HTTP call and every connection attempt carries a short-lived HS256
//! token binding the application's client id and an issue timestamp, signed
//! with the client secret.

use crate::error::{DoshiiError, DoshiiResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Application client id
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// Issue timestamp (seconds since epoch)
    pub timestamp: i64,
    /// Expiry timestamp
    pub exp: i64,
}

/// Issues signed credentials on demand. Stateless.
#[derive(Clone)]
pub struct TokenProvider {
    client_id: String,
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    pub fn new(client_id: impl Into<String>, client_secret: &str) -> Self {
        Self {
            client_id: client_id.into(),
            encoding_key: EncodingKey::from_secret(client_secret.as_bytes()),
            ttl: Duration::minutes(60),
        }
    }

    /// Issue a fresh signed token.
    pub fn issue_token(&self) -> DoshiiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            client_id: self.client_id.clone(),
            timestamp: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DoshiiError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates_against_secret() {
        let provider = TokenProvider::new("app-1", "super-secret-signing-key");
        let token = provider.issue_token().expect("token should be issued");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"super-secret-signing-key"),
            &validation,
        )
        .expect("token should validate");

        assert_eq!(data.claims.client_id, "app-1");
        assert!(data.claims.exp > data.claims.timestamp);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let provider = TokenProvider::new("app-1", "right-secret");
        let token = provider.issue_token().unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        assert!(
            decode::<Claims>(&token, &DecodingKey::from_secret(b"wrong"), &validation).is_err()
        );
    }
}
