//! Sample events and a mock odds client.
//!
//! The sample fixture stands in for live data when the upstream fetch
//! fails; the mock client lets tests drive the feed without a network.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::error::FetchError;

use super::types::{BookmakerQuote, Event, Outcome};

/// Static fallback events: one soccer fixture quoted by two bookmakers.
pub fn sample_events() -> Vec<Event> {
    vec![Event {
        id: Some("sample-flamengo-palmeiras".to_string()),
        sport_key: Some("soccer_brazil_campeonato".to_string()),
        sport_title: Some("Futebol".to_string()),
        commence_time: Some(OffsetDateTime::now_utc()),
        home_team: Some("Flamengo".to_string()),
        away_team: Some("Palmeiras".to_string()),
        bookmakers: vec![
            BookmakerQuote::h2h(
                "bet365",
                vec![
                    Outcome::new("Flamengo", Decimal::new(210, 2)),
                    Outcome::new("Palmeiras", Decimal::new(380, 2)),
                    Outcome::new("Draw", Decimal::new(325, 2)),
                ],
            ),
            BookmakerQuote::h2h(
                "betano",
                vec![
                    Outcome::new("Flamengo", Decimal::new(230, 2)),
                    Outcome::new("Palmeiras", Decimal::new(320, 2)),
                    Outcome::new("Draw", Decimal::new(310, 2)),
                ],
            ),
        ],
    }]
}

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail event requests.
    pub fail_events: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock odds client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockOddsClient {
    /// Mock configuration.
    config: MockConfig,
    /// Events returned for any sport.
    events: Arc<Mutex<Vec<Event>>>,
}

impl MockOddsClient {
    /// Create a new mock client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the events served by the mock.
    pub fn set_events(&self, events: Vec<Event>) {
        if let Ok(mut guard) = self.events.lock() {
            *guard = events;
        }
    }

    /// Fetch mock events.
    pub async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>, FetchError> {
        self.simulate_latency().await;

        if self.config.fail_events {
            return Err(FetchError::Status {
                endpoint: format!("/sports/{}/odds", sport),
                status: 500,
            });
        }

        Ok(self.events.lock().map(|e| e.clone()).unwrap_or_default())
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}
