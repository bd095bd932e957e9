//! Client configuration

use std::time::Duration;

/// Target environment for API and socket endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Sandbox endpoints for integration development
    #[default]
    Sandbox,
    /// Live endpoints
    Production,
}

/// Reconnection backoff policy for the event channel.
///
/// Delays grow exponentially from `initial_delay` up to `max_delay`, with up
/// to 25% random jitter added to each delay. Retries are unbounded.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Backoff delay for the given attempt number (0-based), before jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        base.min(self.max_delay)
    }
}

/// Configuration for connecting to the platform.
#[derive(Debug, Clone)]
pub struct DoshiiConfig {
    /// Target environment (chooses default API and socket URLs)
    pub environment: Environment,

    /// Application client id issued by the platform
    pub client_id: String,

    /// Application client secret, used to sign auth tokens
    pub client_secret: String,

    /// Vendor identifier attached to API calls
    pub vendor: Option<String>,

    /// HTTP request timeout
    pub http_timeout: Duration,

    /// Heartbeat interval on the event channel
    pub heartbeat_interval: Duration,

    /// How long a pending operation waits for its confirmation event
    pub correlation_timeout: Duration,

    /// Reconnection backoff policy
    pub reconnect: ReconnectPolicy,

    /// Tear the connection down when the last subscriber leaves.
    /// When false (default) the channel stays open for the client lifetime.
    pub close_when_idle: bool,

    /// API base URL override (for testing)
    pub api_url: Option<String>,

    /// Socket URL override (for testing)
    pub socket_url: Option<String>,
}

impl DoshiiConfig {
    /// Create a new configuration for the given application credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            environment: Environment::Sandbox,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            vendor: None,
            http_timeout: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(15),
            correlation_timeout: Duration::from_secs(30),
            reconnect: ReconnectPolicy::default(),
            close_when_idle: false,
            api_url: None,
            socket_url: None,
        }
    }

    /// Sandbox environment (default)
    pub fn sandbox(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::new(client_id, client_secret)
    }

    /// Production environment
    pub fn production(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::new(client_id, client_secret).with_environment(Environment::Production)
    }

    /// Set the target environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the vendor identifier
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Set the HTTP request timeout
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the heartbeat interval
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Set the pending-operation timeout
    pub fn with_correlation_timeout(mut self, timeout: Duration) -> Self {
        self.correlation_timeout = timeout;
        self
    }

    /// Set the reconnection backoff policy
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Tear the connection down when the last subscriber leaves
    pub fn with_close_when_idle(mut self, close: bool) -> Self {
        self.close_when_idle = close;
        self
    }

    /// Override the API base URL (testing)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Override the socket URL (testing)
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = Some(url.into());
        self
    }

    /// Effective API base URL for the configured environment.
    pub fn api_base_url(&self) -> String {
        if let Some(ref url) = self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        match self.environment {
            Environment::Sandbox => "https://sandbox.doshii.co/partner/v3".to_string(),
            Environment::Production => "https://live.doshii.co/partner/v3".to_string(),
        }
    }

    /// Effective socket URL for the configured environment.
    pub fn socket_base_url(&self) -> String {
        if let Some(ref url) = self.socket_url {
            return url.trim_end_matches('/').to_string();
        }
        match self.environment {
            Environment::Sandbox => "wss://sandbox-socket.doshii.co/app/socket".to_string(),
            Environment::Production => "wss://live-socket.doshii.co/app/socket".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sandbox() {
        let config = DoshiiConfig::new("id", "secret");
        assert_eq!(config.environment, Environment::Sandbox);
        assert!(config.api_base_url().contains("sandbox"));
        assert!(config.socket_base_url().starts_with("wss://"));
    }

    #[test]
    fn builder_overrides() {
        let config = DoshiiConfig::production("id", "secret")
            .with_vendor("pos-vendor")
            .with_heartbeat_interval(Duration::from_secs(5))
            .with_api_url("http://localhost:9000/v3/");

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.vendor.as_deref(), Some("pos-vendor"));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(5));
        // trailing slash trimmed
        assert_eq!(config.api_base_url(), "http://localhost:9000/v3");
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = ReconnectPolicy {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(2));
    }
}
