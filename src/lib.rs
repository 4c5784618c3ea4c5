//! Sports-betting arbitrage scanner.
//!
//! Finds events where backing every outcome at the best price across
//! bookmakers guarantees a return, and sizes the stakes.
//!
//! # Strategy
//!
//! With decimal odds `p_i`, staking `stake / p_i / Σ(1/p_j)` on each
//! outcome pays the same whichever wins. Profit is guaranteed iff the
//! implied total `Σ(1/p_i)` is below one:
//!
//! ```text
//! Home best: 2.10  -> 1/2.10 = 0.4762
//! Away best: 3.80  -> 1/3.80 = 0.2632
//! ───────────────────────────────────
//! Implied total:            0.7393 < 1 ✅
//! Profit:                   26.07% (100 staked returns 135.25)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`odds`]: Event records, odds API client and sample data
//! - [`arbitrage`]: Best-price aggregation, stake allocation and scanning
//! - [`report`]: Text rendering of scan results
//! - [`api`]: HTTP API for health, scans and metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod metrics;
pub mod odds;
pub mod report;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
