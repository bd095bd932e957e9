//! HTTP client for the REST surface.
//!
//! Thin wrapper over `reqwest`: builds the URL, attaches a freshly issued
//! auth token and the vendor header, maps error statuses to `DoshiiError`.

use crate::auth::TokenProvider;
use crate::config::DoshiiConfig;
use crate::error::{DoshiiError, DoshiiResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    vendor: Option<String>,
    tokens: TokenProvider,
}

impl HttpClient {
    /// Create a new HTTP client from configuration.
    pub fn new(config: &DoshiiConfig, tokens: TokenProvider) -> DoshiiResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(DoshiiError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
            vendor: config.vendor.clone(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> DoshiiResult<RequestBuilder> {
        let token = self.tokens.issue_token()?;
        let mut request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        if let Some(ref vendor) = self.vendor {
            request = request.header("vendor", vendor);
        }
        Ok(request)
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> DoshiiResult<T> {
        let request = self.authorize(self.client.get(self.url(path)))?;
        Self::handle_response(request.send().await?).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> DoshiiResult<T> {
        let request = self.authorize(self.client.get(self.url(path)).query(query))?;
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DoshiiResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body))?;
        Self::handle_response(request.send().await?).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DoshiiResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).json(body))?;
        Self::handle_response(request.send().await?).await
    }

    /// Make a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> DoshiiResult<T> {
        let request = self.authorize(self.client.delete(self.url(path)))?;
        Self::handle_response(request.send().await?).await
    }

    /// Map the HTTP response to a typed result.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> DoshiiResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(DoshiiError::Unauthorized),
                StatusCode::FORBIDDEN => Err(DoshiiError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(DoshiiError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(DoshiiError::Validation(text)),
                _ => Err(DoshiiError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> HttpClient {
        let config = super::super::DoshiiConfig::new("id", "secret")
            .with_api_url("http://localhost:1/api/v3");
        let tokens = TokenProvider::new("id", "secret");
        HttpClient::new(&config, tokens).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = test_client();
        assert_eq!(client.url("/orders"), "http://localhost:1/api/v3/orders");
        assert_eq!(client.url("orders"), "http://localhost:1/api/v3/orders");
    }
}
