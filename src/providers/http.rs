//! HTTP provider for the remote results feed

use tracing::{debug, info};

use crate::feed::RaceDocument;
use crate::provider::ResultsProvider;
use crate::types::{RaceListing, Round, Season};
use crate::{RaceboardError, Result};

/// Default feed base URL.
pub const DEFAULT_BASE_URL: &str = "http://ergast.com/api/f1";

/// Provider that fetches feed documents over HTTP
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    /// Create a provider for the feed rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RaceboardError::config(format!(
                "base URL '{}' must start with http:// or https://",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                RaceboardError::transport_with_source("building HTTP client", Box::new(e))
            })?;

        info!(base_url = %base_url, "HTTP results provider ready");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{season}/{round}/results`
    pub fn results_url(&self, season: Season, round: Round) -> String {
        format!("{}/{}/{}/results", self.base_url, season, round)
    }

    /// `{base}/{season}`
    pub fn races_url(&self, season: Season) -> String {
        format!("{}/{}", self.base_url, season)
    }

    async fn get(&self, url: &str) -> Result<String> {
        debug!(url, "Requesting feed document");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RaceboardError::http_status(url, status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Received feed document");
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ResultsProvider for HttpProvider {
    async fn fetch_results(&self, season: Season, round: Round) -> Result<String> {
        self.get(&self.results_url(season, round)).await
    }

    async fn fetch_races(&self, season: Season) -> Result<Vec<RaceListing>> {
        let body = self.get(&self.races_url(season)).await?;
        Ok(RaceDocument::parse(&body)?.race_listings())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
