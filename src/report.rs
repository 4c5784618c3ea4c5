//! Text rendering of scan results.

use std::fmt::Write;

use time::macros::format_description;
use time::UtcOffset;

use crate::arbitrage::{EventOpportunity, ScanReport, ScanStatus};
use crate::error::Result;
use crate::odds::EventOrigin;

/// Message shown when the event list was empty.
pub const NO_EVENTS_MESSAGE: &str = "No events found. Try another sport.";
/// Message shown when nothing qualified.
pub const NO_OPPORTUNITIES_MESSAGE: &str = "No arbitrage opportunities found.";

/// Render one opportunity as a text card.
pub fn render_card(item: &EventOpportunity) -> String {
    let event = &item.event;
    let opp = &item.opportunity;
    let start = event
        .commence_time
        .and_then(|t| {
            t.to_offset(UtcOffset::UTC)
                .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
                .ok()
        })
        .unwrap_or_else(|| "TBD".to_string());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  ({})",
        event.sport_title.as_deref().unwrap_or("Unknown sport"),
        event.matchup(),
        start
    );
    let _ = writeln!(
        out,
        "  Arbitrage opportunity ({}): {}%",
        opp.market, opp.profit_pct
    );
    let _ = writeln!(out, "  Total stake:       {}", opp.total_stake);
    let _ = writeln!(out, "  Guaranteed return: {}", opp.expected_return);
    let _ = writeln!(out, "  Profit:            {} ({}%)", opp.profit(), opp.profit_pct);
    for leg in &opp.legs {
        let _ = writeln!(
            out,
            "    {:<5} @ {:<6} stake {:>10}  via {}",
            leg.slot.to_string(),
            leg.price.to_string(),
            leg.stake.to_string(),
            item.best.get(leg.slot).bookmaker.as_deref().unwrap_or("?")
        );
    }
    out
}

/// Render a full scan: either the cards or the empty-result message.
pub fn render_report(report: &ScanReport) -> String {
    match report.status() {
        ScanStatus::NoEvents => format!("{}\n", NO_EVENTS_MESSAGE),
        ScanStatus::NoOpportunities => format!(
            "{} ({} events checked, min profit {}%)\n",
            NO_OPPORTUNITIES_MESSAGE, report.evaluated, report.min_profit_pct
        ),
        ScanStatus::Found(_) => report
            .opportunities
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a scan as pretty-printed JSON.
pub fn render_json(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Notice printed when events did not come from the live feed.
pub fn origin_notice(origin: &EventOrigin) -> Option<String> {
    match origin {
        EventOrigin::Live => None,
        EventOrigin::Sample { reason } => Some(format!(
            "Error loading live odds ({}). Using sample data...",
            reason
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::scan_events;
    use crate::odds::{BookmakerQuote, Event, Outcome};
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    fn report_with_one() -> ScanReport {
        let event = Event {
            sport_title: Some("Tennis".to_string()),
            commence_time: Some(datetime!(2024-06-01 14:30 UTC)),
            home_team: Some("Alcaraz".to_string()),
            away_team: Some("Sinner".to_string()),
            bookmakers: vec![
                BookmakerQuote::h2h(
                    "pinnacle",
                    vec![Outcome::new("Alcaraz", dec!(2.10)), Outcome::new("Sinner", dec!(1.70))],
                ),
                BookmakerQuote::h2h(
                    "unibet",
                    vec![Outcome::new("Alcaraz", dec!(1.80)), Outcome::new("Sinner", dec!(3.80))],
                ),
            ],
            ..Default::default()
        };
        scan_events(&[event], dec!(100), dec!(2))
    }

    #[test]
    fn card_shows_amounts_and_bookmakers() {
        let report = report_with_one();
        let card = render_card(&report.opportunities[0]);

        assert!(card.starts_with("[Tennis] Alcaraz vs Sinner  (2024-06-01 14:30 UTC)"));
        assert!(card.contains("two_way): 26.07%"));
        assert!(card.contains("Guaranteed return: 135.25"));
        assert!(card.contains("Profit:            35.25 (26.07%)"));
        assert!(card.contains("via pinnacle"));
        assert!(card.contains("via unibet"));
    }

    #[test]
    fn json_report_carries_status_and_amounts() {
        let json = render_json(&report_with_one()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["evaluated"], 1);
        assert_eq!(value["opportunities"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_reports_render_messages() {
        let none = scan_events(&[], dec!(100), dec!(2));
        assert_eq!(render_report(&none), format!("{}\n", NO_EVENTS_MESSAGE));

        let events = vec![Event::default()];
        let nothing = scan_events(&events, dec!(100), dec!(2));
        assert!(render_report(&nothing).starts_with(NO_OPPORTUNITIES_MESSAGE));
    }

    #[test]
    fn sample_origin_has_notice() {
        assert_eq!(origin_notice(&EventOrigin::Live), None);
        let notice = origin_notice(&EventOrigin::Sample {
            reason: "HTTP 500".to_string(),
        })
        .unwrap();
        assert!(notice.contains("HTTP 500"));
    }
}
