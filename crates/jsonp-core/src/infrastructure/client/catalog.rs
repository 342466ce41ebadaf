//! FDSN event catalog client

use jsonp_domain::{FeatureCollection, Quake};
use tracing::info;
use url::Url;

use crate::{Error, Result, config::CatalogConfig};

/// Queries an FDSN event endpoint for recent quakes
#[derive(Debug, Clone)]
pub struct QuakeCatalog {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl QuakeCatalog {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Endpoint with `format=json&limit=<limit>` appended
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the endpoint does not parse.
    pub fn query_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint)?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", &self.config.limit.to_string());
        Ok(url)
    }

    /// Most recent events, as many as the configured limit
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] on network failure, a non-success status or a
    /// body that is not FDSN GeoJSON.
    pub async fn recent(&self) -> Result<Vec<Quake>> {
        let url = self.query_url()?;
        info!(%url, "querying event catalog");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::load(url.as_str(), format!("HTTP status {status}")));
        }

        let collection: FeatureCollection = response.json().await?;
        info!(count = collection.features.len(), "catalog returned events");
        Ok(collection.features)
    }
}
