//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::arbitrage::{scan_events, ScanReport, ScanStatus};
use crate::config::{check_scan_params, Config};
use crate::odds::{load_events, EventOrigin, FallbackPolicy, OddsSource};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the server is ready to serve scans.
    pub ready: Arc<AtomicBool>,
    /// Where events are loaded from.
    pub source: OddsSource,
    /// Defaults for scans.
    pub config: Arc<Config>,
    /// Fallback behaviour on fetch failure.
    pub fallback: FallbackPolicy,
    /// Summary of the most recent scan.
    pub last_scan: Arc<RwLock<Option<ScanSummary>>>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(source: OddsSource, config: Config) -> Self {
        let fallback = FallbackPolicy::from_config(&config);
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            source,
            config: Arc::new(config),
            fallback,
            last_scan: Arc::new(RwLock::new(None)),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Override the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether service is ready.
    pub ready: bool,
}

/// Summary of one scan, kept for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Sport scanned.
    pub sport: String,
    /// Where the events came from.
    #[serde(flatten)]
    pub origin: EventOrigin,
    /// Scan outcome.
    pub result: ScanStatus,
    /// Events evaluated.
    pub evaluated: usize,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Default sport.
    pub sport: String,
    /// Default stake.
    pub stake: Decimal,
    /// Default minimum profit.
    pub min_profit_pct: Decimal,
    /// Most recent scan.
    pub last_scan: Option<ScanSummary>,
}

/// Query parameters for an opportunity scan.
#[derive(Debug, Default, Deserialize)]
pub struct ScanQuery {
    /// Sport key; defaults to the configured sport.
    pub sport: Option<String>,
    /// Total stake; defaults to the configured stake.
    pub stake: Option<Decimal>,
    /// Minimum profit percent; defaults to the configured threshold.
    pub min_profit: Option<Decimal>,
}

/// Opportunity scan response.
#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    /// Sport scanned.
    pub sport: String,
    /// Where the events came from.
    #[serde(flatten)]
    pub origin: EventOrigin,
    /// Scan outcome.
    pub result: ScanStatus,
    /// Full report.
    pub report: ScanReport,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse { ready: is_ready };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns defaults and the last scan.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let last_scan = state.last_scan.read().await.clone();
    let status = if state.is_ready() { "running" } else { "starting" };

    Json(StatusResponse {
        status,
        sport: state.config.odds_sport.clone(),
        stake: state.config.stake,
        min_profit_pct: state.config.min_profit_pct,
        last_scan,
    })
}

/// Load events and scan them for arbitrage.
pub async fn opportunities(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> axum::response::Response {
    let sport = query
        .sport
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.odds_sport.clone());
    let stake = query.stake.unwrap_or(state.config.stake);
    let min_profit = query.min_profit.unwrap_or(state.config.min_profit_pct);

    if let Err(e) = check_scan_params(stake, min_profit) {
        return error(StatusCode::BAD_REQUEST, e);
    }

    let loaded = match load_events(&state.source, &sport, state.fallback).await {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, sport = %sport, "Scan failed");
            return error(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    let report = scan_events(&loaded.events, stake, min_profit);
    let summary = ScanSummary {
        sport: sport.clone(),
        origin: loaded.origin.clone(),
        result: report.status(),
        evaluated: report.evaluated,
    };
    *state.last_scan.write().await = Some(summary);

    Json(OpportunitiesResponse {
        sport,
        origin: loaded.origin,
        result: report.status(),
        report,
    })
    .into_response()
}

/// Prometheus metrics handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
