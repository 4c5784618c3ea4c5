//! Arbitrage opportunity detection over event lists.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::calculator::{evaluate, implied_total, round_output, Opportunity};
use super::prices::{best_prices, BestPrices};
use crate::metrics;
use crate::odds::Event;

/// An event that passed the scan, with the numbers behind it.
#[derive(Debug, Clone, Serialize)]
pub struct EventOpportunity {
    /// The event.
    pub event: Event,
    /// Best prices used.
    pub best: BestPrices,
    /// The computed opportunity.
    pub opportunity: Opportunity,
}

/// Outcome category of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum ScanStatus {
    /// The event list was empty.
    NoEvents,
    /// Events were evaluated but none qualified.
    NoOpportunities,
    /// This many events qualified.
    Found(usize),
}

/// Result of scanning an event list.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Number of events evaluated.
    pub evaluated: usize,
    /// Stake used for every event.
    pub stake: Decimal,
    /// Minimum profit threshold applied.
    pub min_profit_pct: Decimal,
    /// Qualifying events in input order.
    pub opportunities: Vec<EventOpportunity>,
}

impl ScanReport {
    /// Scan outcome category.
    pub fn status(&self) -> ScanStatus {
        if self.evaluated == 0 {
            ScanStatus::NoEvents
        } else if self.opportunities.is_empty() {
            ScanStatus::NoOpportunities
        } else {
            ScanStatus::Found(self.opportunities.len())
        }
    }

    /// Whether nothing qualified.
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// Evaluate one event: aggregate its quotes and run the engine.
pub fn evaluate_event(
    event: &Event,
    stake: Decimal,
    min_profit_pct: Decimal,
) -> (BestPrices, Opportunity) {
    let best = best_prices(&event.bookmakers);
    let opportunity = evaluate(&best, stake, min_profit_pct);
    (best, opportunity)
}

/// Scan events and keep those with a qualifying arbitrage.
#[instrument(skip_all, fields(events = events.len(), stake = %stake, min_profit = %min_profit_pct))]
pub fn scan_events(events: &[Event], stake: Decimal, min_profit_pct: Decimal) -> ScanReport {
    let _timer = metrics::timer_scan();
    let mut opportunities = Vec::new();

    for event in events {
        let (best, opportunity) = evaluate_event(event, stake, min_profit_pct);
        metrics::inc_events_evaluated();

        if opportunity.qualifies(min_profit_pct) {
            info!(
                event = %event.matchup(),
                market = %opportunity.market,
                profit_pct = %opportunity.profit_pct,
                expected_return = %opportunity.expected_return,
                "Arbitrage opportunity detected"
            );
            metrics::inc_opportunities_found();
            opportunities.push(EventOpportunity {
                event: event.clone(),
                best,
                opportunity,
            });
        } else {
            debug!(event = %event.matchup(), diagnosis = %diagnose(&best), "No arbitrage opportunity");
        }
    }

    let report = ScanReport {
        evaluated: events.len(),
        stake,
        min_profit_pct,
        opportunities,
    };
    debug!(status = ?report.status(), "Scan complete");

    report
}

/// Diagnose why best prices produce no opportunity.
pub fn diagnose(best: &BestPrices) -> NoOpportunityDiagnosis {
    let legs = best.legs();
    let prices: Vec<Decimal> = legs.iter().map(|(_, p)| *p).collect();
    let total = implied_total(&prices);

    NoOpportunityDiagnosis {
        best: best.clone(),
        implied_total: total,
        profit_pct: total.map(|t| round_output((Decimal::ONE - t) * Decimal::ONE_HUNDRED)),
        missing_price: legs.iter().any(|(_, p)| p.is_zero()),
    }
}

/// Diagnostic information for debugging.
#[derive(Debug, Clone)]
pub struct NoOpportunityDiagnosis {
    /// Best prices evaluated.
    pub best: BestPrices,
    /// Implied total, when every required price exists.
    pub implied_total: Option<Decimal>,
    /// Profit the split would make (negative when none).
    pub profit_pct: Option<Decimal>,
    /// Whether a required outcome had no price.
    pub missing_price: bool,
}

impl std::fmt::Display for NoOpportunityDiagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} home={} away={} draw={} | implied={} profit={}%{}",
            self.best.market_kind(),
            self.best.home.price,
            self.best.away.price,
            self.best.draw.price,
            self.implied_total
                .map(|t| t.round_dp(4).to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.profit_pct
                .map(|p| p.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            if self.missing_price { " (missing price)" } else { "" },
        )
    }
}
