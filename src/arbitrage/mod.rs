//! Arbitrage module for detecting betting splits across bookmakers.
//!
//! This module handles:
//! - Best-price aggregation across bookmaker quotes
//! - Stake allocation and guaranteed-return calculations
//! - Scanning event lists for qualifying opportunities

pub mod calculator;
pub mod detector;
pub mod prices;

pub use calculator::{calculate, evaluate, implied_total, Opportunity, StakeLeg};
pub use detector::{
    diagnose, evaluate_event, scan_events, EventOpportunity, NoOpportunityDiagnosis, ScanReport,
    ScanStatus,
};
pub use prices::{best_prices, BestPrice, BestPrices, MarketKind};
