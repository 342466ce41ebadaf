//! Configuration for the responder, fetcher and seismic clients
//!
//! Every section implements `Default` with the values the tools ship with
//! and deserializes with `#[serde(default)]`, so partial documents are
//! accepted. Builders follow the `with_*` convention.

use std::{net::SocketAddr, time::Duration};

use jsonp_domain::{CallbackName, Payload};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Route the responder reserves for its health report
pub const HEALTH_PATH: &str = "/health";

/// Aggregate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonpConfig {
    /// HTTP responder
    pub responder: ResponderConfig,
    /// JSONP fetcher
    pub fetcher: FetcherConfig,
    /// Seismic push feed
    pub feed: FeedConfig,
    /// Event catalog and proximity reports
    pub catalog: CatalogConfig,
}

/// How the responder treats the requested callback name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPolicy {
    /// Echo any non-empty name unchanged
    #[default]
    Verbatim,
    /// Echo only dotted JavaScript identifiers; anything else falls back to
    /// the default name
    Identifier,
}

/// Responder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Address the demo server binds
    pub bind_addr: SocketAddr,
    /// Route serving the callback-wrapped payload
    pub path: String,
    /// Route serving the bare JSON payload
    pub json_path: String,
    /// Query parameter carrying the callback name
    pub callback_param: String,
    /// Name used when the request names none
    pub default_callback: CallbackName,
    /// Which requested callback names are echoed
    pub policy: CallbackPolicy,
    /// Record served on every request
    pub payload: Payload,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8081)),
            path: "/seismic.jsonp".to_string(),
            json_path: "/seismic.json".to_string(),
            callback_param: "callback".to_string(),
            default_callback: CallbackName::responder_default(),
            policy: CallbackPolicy::Verbatim,
            payload: Payload::default(),
        }
    }
}

impl ResponderConfig {
    /// Listen on `addr`
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Serve the script route at `path`
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set which callback names are echoed
    pub fn with_policy(mut self, policy: CallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Serve `payload` instead of the default
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Check that the routes can be mounted side by side
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a route that does not start with `/`,
    /// routes that collide, or an empty callback parameter.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.path, &self.json_path] {
            if !path.starts_with('/') {
                return Err(Error::Config(format!("route '{path}' must start with '/'")));
            }
            if path == HEALTH_PATH {
                return Err(Error::Config(format!("route '{path}' is reserved")));
            }
        }
        if self.path == self.json_path {
            return Err(Error::Config(format!(
                "script and JSON routes are both '{}'",
                self.path
            )));
        }
        if self.callback_param.is_empty() {
            return Err(Error::Config("callback parameter must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Query parameter carrying the callback name
    pub callback_param: String,
    /// Name registered when the caller supplies none
    pub default_callback: CallbackName,
    /// Base that relative URLs are resolved against
    pub base_url: Option<String>,
    /// Whole-request timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
    /// `User-Agent` header sent with every request
    pub user_agent: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            callback_param: "callback".to_string(),
            default_callback: CallbackName::fetcher_default(),
            base_url: None,
            timeout_ms: None,
            user_agent: Some(concat!("jsonp-rs/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl FetcherConfig {
    /// Resolve relative URLs against `base`
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }

    /// Abort requests that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Register `name` when the caller supplies none
    pub fn with_default_callback(mut self, name: CallbackName) -> Self {
        self.default_callback = name;
        self
    }

    /// Configured request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Seismic push-feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// WebSocket endpoint
    pub gateway: String,
    /// Seconds between client pings
    pub ping_interval_secs: u64,
    /// Buffered events before the reader waits on the consumer
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            gateway: "wss://www.seismicportal.eu/standing_order/websocket".to_string(),
            ping_interval_secs: 15,
            channel_capacity: 64,
        }
    }
}

impl FeedConfig {
    /// Connect to `gateway` instead of the public feed
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Ping every `interval`, truncated to whole seconds
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval_secs = interval.as_secs();
        self
    }

    /// Ping period, never shorter than one second
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs.max(1))
    }
}

/// FDSN event catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// FDSN event query endpoint
    pub endpoint: String,
    /// Events requested per query
    pub limit: usize,
    /// Neighbours kept per quake in proximity reports
    pub neighbours: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.seismicportal.eu/fdsnws/event/1/query".to_string(),
            limit: 100,
            neighbours: 3,
        }
    }
}

impl CatalogConfig {
    /// Query `endpoint` instead of the public catalog
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request at most `limit` events
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JsonpConfig::default();
        assert_eq!(config.responder.bind_addr.port(), 8081);
        assert_eq!(config.responder.default_callback.as_str(), "callback");
        assert_eq!(config.fetcher.default_callback.as_str(), "handleData");
        assert_eq!(config.fetcher.timeout(), None);
        assert_eq!(config.feed.ping_interval(), Duration::from_secs(15));
        assert_eq!(config.catalog.limit, 100);
    }

    #[test]
    fn test_partial_document() {
        let config: JsonpConfig = serde_json::from_str(
            r#"{"responder": {"policy": "identifier", "payload": {"name": "bob"}},
                "fetcher": {"timeout_ms": 250}}"#,
        )
        .unwrap();

        assert_eq!(config.responder.policy, CallbackPolicy::Identifier);
        assert_eq!(config.responder.payload, Payload::new("bob"));
        assert_eq!(config.responder.path, "/seismic.jsonp");
        assert_eq!(config.fetcher.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_validate_routes() {
        assert!(ResponderConfig::default().validate().is_ok());
        assert!(ResponderConfig::default().with_path("data").validate().is_err());
        assert!(ResponderConfig::default().with_path("/health").validate().is_err());
        assert!(ResponderConfig::default().with_path("/seismic.json").validate().is_err());
    }

    #[test]
    fn test_ping_interval_floor() {
        let config = FeedConfig::default().with_ping_interval(Duration::from_millis(10));
        assert_eq!(config.ping_interval(), Duration::from_secs(1));
    }
}
