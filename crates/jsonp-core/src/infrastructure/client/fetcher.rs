//! JSONP fetcher
//!
//! Issues a GET with the callback parameter set, decodes the
//! `<callback>(<json>);` body and hands the argument to whichever call is
//! registered under that callback name. One attempt per call: load failures
//! reject, nothing is retried.

use std::sync::Arc;

use jsonp_domain::{CallbackName, ScriptBody};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{CallbackRegistry, Error, Result, config::FetcherConfig};

/// HTTP client for callback-wrapped JSON endpoints
#[derive(Debug, Clone)]
pub struct JsonpFetcher {
    client: reqwest::Client,
    registry: Arc<CallbackRegistry>,
    config: FetcherConfig,
    base_url: Option<Url>,
}

impl JsonpFetcher {
    /// Create a fetcher with its own callback registry
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for an unparsable base URL and
    /// [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: FetcherConfig) -> Result<Self> {
        Self::with_registry(config, Arc::new(CallbackRegistry::new()))
    }

    /// Create a fetcher that dispatches through a shared registry
    ///
    /// # Errors
    ///
    /// See [`JsonpFetcher::new`].
    pub fn with_registry(config: FetcherConfig, registry: Arc<CallbackRegistry>) -> Result<Self> {
        let base_url = config.base_url.as_deref().map(Url::parse).transpose()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            registry,
            config,
            base_url,
        })
    }

    /// Registry this fetcher dispatches through
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Settings the fetcher was built with
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch `url`, registering `callback_name` or the configured default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for an empty callback name, otherwise see
    /// [`JsonpFetcher::fetch`].
    pub async fn get_data_jsonp<T: DeserializeOwned>(
        &self,
        url: &str,
        callback_name: Option<&str>,
    ) -> Result<T> {
        let callback = match callback_name {
            Some(name) => CallbackName::new(name)?,
            None => self.config.default_callback.clone(),
        };
        self.fetch(url, callback).await
    }

    /// Fetch `url` under a generated callback name no other call shares
    ///
    /// # Errors
    ///
    /// See [`JsonpFetcher::fetch`].
    pub async fn fetch_unique<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch(url, CallbackName::unique()).await
    }

    /// Fetch `url` with `callback` registered for the duration of the call
    ///
    /// # Errors
    ///
    /// - [`Error::CallbackInUse`] if another call is waiting on `callback`
    /// - [`Error::InvalidUrl`] if `url` cannot be parsed or resolved
    /// - [`Error::Load`] on network failure or a non-success status
    /// - [`Error::Domain`] if the body is not a call expression with JSON
    /// - [`Error::UnregisteredCallback`] / [`Error::Abandoned`] if the body
    ///   calls a different callback than the one registered
    /// - [`Error::Json`] if the data does not decode into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str, callback: CallbackName) -> Result<T> {
        let pending = self.registry.register(callback)?;
        let request_url = self.request_url(url, pending.name())?;
        debug!(url = %request_url, callback = %pending.name(), "fetching JSONP resource");

        let body = self.load(&request_url).await?;

        let script = ScriptBody::parse_for(&body, pending.name()).or_else(|_| ScriptBody::parse(&body))?;
        let invoked = script.callback().clone();
        self.registry.invoke(&invoked, script.value()?)?;

        if &invoked != pending.name() {
            warn!(
                expected = %pending.name(),
                invoked = %invoked,
                "response invoked a different callback"
            );
            return Err(Error::Abandoned(pending.name().to_string()));
        }

        let data = pending.wait().await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch `url` as plain JSON, without callback wrapping
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] on network failure or a non-success status and
    /// [`Error::Json`] if the body does not decode into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let url = self.resolve(url)?;
        let body = self.load(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `url` resolved against the base URL with the callback parameter set
    ///
    /// Existing occurrences of the parameter are replaced; other query
    /// pairs keep their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` cannot be parsed or resolved.
    pub fn request_url(&self, url: &str, callback: &CallbackName) -> Result<Url> {
        let mut url = self.resolve(url)?;
        let param = self.config.callback_param.as_str();

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != param)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .append_pair(param, callback.as_str());

        Ok(url)
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match (Url::parse(url), &self.base_url) {
            (Ok(url), _) => Ok(url),
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => Ok(base.join(url)?),
            (Err(e), _) => Err(Error::InvalidUrl(format!("{url}: {e}"))),
        }
    }

    async fn load(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::load(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::load(url.as_str(), format!("HTTP status {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::load(url.as_str(), e.to_string()))
    }
}

/// Fetch `url` once with a fresh default fetcher
///
/// `callback_name` defaults to `handleData`.
///
/// # Errors
///
/// See [`JsonpFetcher::fetch`].
pub async fn get_data_jsonp<T: DeserializeOwned>(
    url: &str,
    callback_name: Option<&str>,
) -> Result<T> {
    JsonpFetcher::new(FetcherConfig::default())?
        .get_data_jsonp(url, callback_name)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(config: FetcherConfig) -> JsonpFetcher {
        JsonpFetcher::new(config).unwrap()
    }

    fn name(s: &str) -> CallbackName {
        CallbackName::new(s).unwrap()
    }

    #[test]
    fn test_request_url_appends_callback() {
        let f = fetcher(FetcherConfig::default());
        let url = f
            .request_url("http://localhost:8081/seismic.jsonp", &name("handleData"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/seismic.jsonp?callback=handleData"
        );
    }

    #[test]
    fn test_request_url_replaces_existing_callback() {
        let f = fetcher(FetcherConfig::default());
        let url = f
            .request_url("http://h/p?a=1&callback=old&b=2&callback=older", &name("cb"))
            .unwrap();
        assert_eq!(url.query(), Some("a=1&b=2&callback=cb"));
    }

    #[test]
    fn test_request_url_encodes_name() {
        let f = fetcher(FetcherConfig::default());
        let url = f.request_url("http://h/p", &name("a b&c")).unwrap();
        assert_eq!(url.query(), Some("callback=a+b%26c"));
    }

    #[test]
    fn test_relative_url_needs_base() {
        let f = fetcher(FetcherConfig::default());
        assert!(matches!(
            f.request_url("/seismic.jsonp", &name("cb")),
            Err(Error::InvalidUrl(_))
        ));

        let f = fetcher(FetcherConfig::default().with_base_url("http://localhost:8081/app/"));
        let url = f.request_url("seismic.jsonp", &name("cb")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/app/seismic.jsonp?callback=cb"
        );
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let result = JsonpFetcher::new(FetcherConfig::default().with_base_url("not a url"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_busy_name_rejected_before_any_request() {
        let f = fetcher(FetcherConfig::default());
        let _held = f.registry().register(name("handleData")).unwrap();

        let result: Result<serde_json::Value> = f.get_data_jsonp("http://127.0.0.1:9/x", None).await;
        assert!(matches!(result, Err(Error::CallbackInUse(n)) if n == "handleData"));
    }
}
