//! Integration tests for the odds arbitrage scanner.
//!
//! The live test requires a valid ODDS_API_KEY environment variable.
//! Run with: cargo test --test integration -- --ignored
//!
//! Note: the live test spends request quota on the real odds API.

use std::time::Duration;

use odds_arb::arbitrage::{scan_events, ScanStatus};
use odds_arb::config::Config;
use odds_arb::odds::{
    load_events, sample_events, BookmakerQuote, Event, EventOrigin, FallbackPolicy, MockConfig,
    MockOddsClient, OddsApiClient, OddsSource, Outcome,
};
use odds_arb::report::render_report;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

/// Get a live config from environment.
fn live_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ODDS_API_KEY").ok()?;
    if api_key.trim().is_empty() {
        return None;
    }

    Some(Config {
        odds_api_key: Some(api_key),
        odds_sport: std::env::var("ODDS_SPORT").unwrap_or_else(|_| "upcoming".to_string()),
        ..Config::default()
    })
}

fn tennis_event() -> Event {
    serde_json::from_str(
        r#"{
            "id": "t1",
            "sport_key": "tennis_atp_french_open",
            "sport_title": "ATP French Open",
            "commence_time": "2024-06-01T14:30:00Z",
            "home_team": "Player One",
            "away_team": "Player Two",
            "bookmakers": [
                {"key": "pinnacle", "markets": [{"key": "h2h", "outcomes": [
                    {"name": "Player One", "price": 2.10},
                    {"name": "Player Two", "price": 1.70}
                ]}]},
                {"key": "unibet", "markets": [{"key": "h2h", "outcomes": [
                    {"name": "Player One", "price": 1.80},
                    {"name": "Player Two", "price": 3.80}
                ]}]},
                {"key": "broken", "markets": [{"key": "h2h", "outcomes": [
                    {"name": "Player One"},
                    null
                ]}]}
            ]
        }"#,
    )
    .expect("fixture parses")
}

#[tokio::test]
async fn mock_feed_pipeline_finds_two_way_arbitrage() {
    let mock = MockOddsClient::new();
    mock.set_events(vec![tennis_event()]);
    let source = OddsSource::Mock(mock);

    let loaded = load_events(&source, "tennis", FallbackPolicy::disabled())
        .await
        .unwrap();
    let report = scan_events(&loaded.events, dec!(100), dec!(2));

    assert_eq!(loaded.origin, EventOrigin::Live);
    assert_eq!(report.status(), ScanStatus::Found(1));
    let found = &report.opportunities[0];
    assert_eq!(found.opportunity.profit_pct, dec!(26.07));
    assert_eq!(found.opportunity.total_stake, dec!(100.00));
    assert_eq!(found.opportunity.expected_return, dec!(135.25));
    assert!(render_report(&report).contains("Player One vs Player Two"));
}

#[tokio::test]
async fn failed_feed_falls_back_to_sample_without_opportunities() {
    let source = OddsSource::Mock(MockOddsClient::with_config(MockConfig {
        fail_events: true,
        ..Default::default()
    }));
    let policy = FallbackPolicy {
        enabled: true,
        delay: Duration::ZERO,
    };

    let loaded = load_events(&source, "soccer", policy).await.unwrap();
    let report = scan_events(&loaded.events, dec!(100), dec!(2));

    assert!(matches!(loaded.origin, EventOrigin::Sample { .. }));
    assert_eq!(report.status(), ScanStatus::NoOpportunities);
}

#[test]
fn stake_scales_linearly() {
    let events = vec![tennis_event()];

    let small = scan_events(&events, dec!(100), dec!(2));
    let large = scan_events(&events, dec!(1000), dec!(2));

    let small = &small.opportunities[0].opportunity;
    let large = &large.opportunities[0].opportunity;
    assert_eq!(small.profit_pct, large.profit_pct);
    assert_eq!(large.expected_return, dec!(1352.54));
}

#[test]
fn sample_events_are_three_way_overround() {
    let report = scan_events(&sample_events(), dec!(100), dec!(0));
    assert!(report.is_empty());
}

#[test]
fn quote_order_does_not_change_result() {
    let mut event = tennis_event();
    let forward = scan_events(std::slice::from_ref(&event), dec!(100), dec!(2));
    event.bookmakers.reverse();
    let reversed = scan_events(std::slice::from_ref(&event), dec!(100), dec!(2));

    assert_eq!(
        forward.opportunities[0].opportunity,
        reversed.opportunities[0].opportunity
    );
    assert_eq!(forward.opportunities[0].best, reversed.opportunities[0].best);
}

#[test]
fn three_way_arbitrage_allocates_all_legs() {
    let event = Event {
        home_team: Some("Home".to_string()),
        away_team: Some("Away".to_string()),
        bookmakers: vec![
            BookmakerQuote::h2h(
                "a",
                vec![
                    Outcome::new("Home", dec!(3.40)),
                    Outcome::new("Away", dec!(2.00)),
                    Outcome::new("Draw", dec!(4.20)),
                ],
            ),
            BookmakerQuote::h2h(
                "b",
                vec![
                    Outcome::new("Home", dec!(2.00)),
                    Outcome::new("Away", dec!(3.90)),
                    Outcome::new("Draw", dec!(3.00)),
                ],
            ),
        ],
        ..Default::default()
    };

    let report = scan_events(&[event], dec!(100), dec!(2));

    let opp = &report.opportunities[0].opportunity;
    assert_eq!(opp.legs.len(), 3);
    assert_eq!(opp.profit_pct, dec!(21.14));
    assert_eq!(opp.expected_return, dec!(126.80));
}

/// Test that the live API answers with a parseable event list.
#[tokio::test]
#[ignore = "requires ODDS_API_KEY"]
async fn test_live_fetch_and_scan() {
    let config = match live_config() {
        Some(c) => c,
        None => {
            println!("Skipping: ODDS_API_KEY not set");
            return;
        }
    };

    let client = OddsApiClient::new(&config).unwrap();
    let sports = client.list_sports().await;
    assert!(sports.is_ok(), "Failed to list sports: {:?}", sports.err());

    let events = client.fetch_events(&config.odds_sport).await;
    assert!(events.is_ok(), "Failed to fetch events: {:?}", events.err());

    let events = events.unwrap();
    let report = scan_events(&events, config.stake, config.min_profit_pct);
    println!("Scanned {} events: {:?}", report.evaluated, report.status());
}
