//! Event source with fallback to sample data.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

use super::client::OddsApiClient;
use super::sample::{sample_events, MockOddsClient};
use super::types::Event;

/// Where events are loaded from.
#[derive(Debug, Clone)]
pub enum OddsSource {
    /// Live odds API.
    Live(OddsApiClient),
    /// In-memory mock (tests and offline runs).
    Mock(MockOddsClient),
}

impl OddsSource {
    /// Fetch events for a sport.
    pub async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>, FetchError> {
        match self {
            OddsSource::Live(client) => client.fetch_events(sport).await,
            OddsSource::Mock(client) => client.fetch_events(sport).await,
        }
    }
}

/// What to do when the fetch fails.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    /// Serve sample events after a failed fetch.
    pub enabled: bool,
    /// Wait before serving sample events.
    pub delay: Duration,
}

impl FallbackPolicy {
    /// Never fall back.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            delay: Duration::ZERO,
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.sample_fallback,
            delay: config.fallback_delay(),
        }
    }
}

/// Origin of a loaded event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum EventOrigin {
    /// Fetched from the odds API.
    Live,
    /// Sample data served after a failed fetch.
    Sample {
        /// Why the live fetch failed.
        reason: String,
    },
}

/// Events together with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedEvents {
    /// The events.
    pub events: Vec<Event>,
    /// Their origin.
    pub origin: EventOrigin,
}

/// Load events for a sport, falling back to sample data on transient failure.
///
/// An empty live list is returned as-is.
#[instrument(skip(source, policy))]
pub async fn load_events(
    source: &OddsSource,
    sport: &str,
    policy: FallbackPolicy,
) -> Result<LoadedEvents, FetchError> {
    match source.fetch_events(sport).await {
        Ok(events) => {
            info!(count = events.len(), "Loaded live events");
            Ok(LoadedEvents {
                events,
                origin: EventOrigin::Live,
            })
        }
        Err(e) if policy.enabled && e.is_transient() => {
            metrics::inc_fetch_failures();
            warn!(
                error = %e,
                delay_ms = policy.delay.as_millis() as u64,
                "Odds fetch failed, using sample data"
            );
            if !policy.delay.is_zero() {
                tokio::time::sleep(policy.delay).await;
            }
            metrics::inc_sample_fallbacks();
            Ok(LoadedEvents {
                events: sample_events(),
                origin: EventOrigin::Sample {
                    reason: e.to_string(),
                },
            })
        }
        Err(e) => {
            metrics::inc_fetch_failures();
            Err(e)
        }
    }
}
