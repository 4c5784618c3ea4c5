//! Odds module for bookmaker head-to-head quotes.
//!
//! This module handles:
//! - Event, quote and outcome records
//! - The odds API client
//! - Sample fallback data and a mock client for testing
//! - Loading events with fallback

pub mod client;
pub mod feed;
pub mod sample;
pub mod types;

pub use client::OddsApiClient;
pub use feed::{load_events, EventOrigin, FallbackPolicy, LoadedEvents, OddsSource};
pub use sample::{sample_events, MockConfig, MockOddsClient};
pub use types::{BookmakerQuote, Event, Market, Outcome, OutcomeSlot, Sport};
