//! Prometheus metrics for feed and scan monitoring.
//!
//! This module provides metrics for:
//! - Odds API request latency
//! - Scan latency
//! - Events evaluated and opportunities found
//! - Fetch failures and sample-data fallbacks

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Odds API request latency metric name.
pub const METRIC_ODDS_FETCH_LATENCY: &str = "odds_fetch_latency_ms";
/// Scan latency metric name.
pub const METRIC_SCAN_LATENCY: &str = "scan_latency_ms";
/// Events evaluated counter metric name.
pub const METRIC_EVENTS_EVALUATED: &str = "events_evaluated_total";
/// Opportunities found counter metric name.
pub const METRIC_OPPORTUNITIES_FOUND: &str = "opportunities_found_total";
/// Fetch failures counter metric name.
pub const METRIC_FETCH_FAILURES: &str = "odds_fetch_failures_total";
/// Sample fallbacks counter metric name.
pub const METRIC_SAMPLE_FALLBACKS: &str = "sample_fallbacks_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_ODDS_FETCH_LATENCY,
        "Odds API request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SCAN_LATENCY,
        "Time to scan an event list in milliseconds"
    );

    describe_counter!(METRIC_EVENTS_EVALUATED, "Total number of events evaluated");
    describe_counter!(
        METRIC_OPPORTUNITIES_FOUND,
        "Total number of qualifying arbitrage opportunities"
    );
    describe_counter!(METRIC_FETCH_FAILURES, "Total number of failed odds fetches");
    describe_counter!(
        METRIC_SAMPLE_FALLBACKS,
        "Total number of times sample data was served"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and describe metrics.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record odds API request latency.
pub fn record_fetch_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ODDS_FETCH_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment events evaluated counter.
pub fn inc_events_evaluated() {
    counter!(METRIC_EVENTS_EVALUATED).increment(1);
}

/// Increment opportunities found counter.
pub fn inc_opportunities_found() {
    counter!(METRIC_OPPORTUNITIES_FOUND).increment(1);
}

/// Increment fetch failures counter.
pub fn inc_fetch_failures() {
    counter!(METRIC_FETCH_FAILURES).increment(1);
}

/// Increment sample fallbacks counter.
pub fn inc_sample_fallbacks() {
    counter!(METRIC_SAMPLE_FALLBACKS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a scan.
pub fn timer_scan() -> LatencyTimer {
    LatencyTimer::new(METRIC_SCAN_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 9.0);
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        inc_events_evaluated();
        inc_opportunities_found();
        record_fetch_latency(Instant::now(), "/sports");
    }
}
