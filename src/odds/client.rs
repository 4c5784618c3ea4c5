//! Odds API client wrapper.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

use super::types::{Event, Sport, H2H_MARKET};

/// Header reporting the remaining request quota.
const REQUESTS_REMAINING_HEADER: &str = "x-requests-remaining";

/// HTTP client for the odds API.
#[derive(Debug, Clone)]
pub struct OddsApiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// API base URL (e.g. https://api.the-odds-api.com/v4).
    base_url: String,
    /// API credential.
    api_key: Option<String>,
    /// Bookmaker regions to request.
    regions: String,
}

impl OddsApiClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: config.odds_api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            regions: config.odds_regions.clone(),
        })
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// List available sports. Used to verify the API key.
    #[instrument(skip(self))]
    pub async fn list_sports(&self) -> Result<Vec<Sport>, FetchError> {
        let url = self.endpoint(&["sports"])?;
        self.get_json(url, &[]).await
    }

    /// Fetch head-to-head decimal odds for every upcoming event of a sport.
    #[instrument(skip(self))]
    pub async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>, FetchError> {
        let url = self.endpoint(&["sports", sport, "odds"])?;
        let params = [
            ("regions", self.regions.as_str()),
            ("markets", H2H_MARKET),
            ("oddsFormat", "decimal"),
        ];

        let events: Vec<Event> = self.get_json(url, &params).await?;
        debug!(count = events.len(), "Fetched events");

        Ok(events)
    }

    /// Build an endpoint URL below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let endpoint = url.path().to_string();
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .query(&[("apiKey", api_key)])
            .query(params)
            .send()
            .await
            .map_err(redact)?;

        metrics::record_fetch_latency(start, &endpoint);

        if let Some(remaining) = response
            .headers()
            .get(REQUESTS_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            debug!(remaining = %remaining, "Odds API quota");
        }

        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(redact)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Drop the request URL from a transport error; its query carries the API key.
fn redact(err: reqwest::Error) -> FetchError {
    FetchError::Http(err.without_url())
}
