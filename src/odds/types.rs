//! Odds records as delivered by the upstream API.
//!
//! Every field is optional: upstream payloads are untyped JSON and a missing
//! field must read as "not offered" rather than fail the whole response.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Key of the head-to-head market.
pub const H2H_MARKET: &str = "h2h";

/// Positional outcome slot within a head-to-head market.
///
/// Upstream quotes list outcomes positionally: first side, second side,
/// then draw for three-way markets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutcomeSlot {
    /// First side (position 0).
    Home,
    /// Second side (position 1).
    Away,
    /// Draw (position 2, three-way markets only).
    Draw,
}

impl OutcomeSlot {
    /// All slots in positional order.
    pub const ALL: [OutcomeSlot; 3] = [OutcomeSlot::Home, OutcomeSlot::Away, OutcomeSlot::Draw];

    /// Map an outcome position to its slot.
    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    /// Position of this slot in a quote's outcome list.
    pub fn position(&self) -> usize {
        match self {
            OutcomeSlot::Home => 0,
            OutcomeSlot::Away => 1,
            OutcomeSlot::Draw => 2,
        }
    }
}

/// A priced outcome quoted by one bookmaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Outcome name (team name or "Draw").
    #[serde(default)]
    pub name: Option<String>,
    /// Decimal odds. `None` when absent, unparseable or non-positive.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Decimal>,
}

impl Outcome {
    /// Create a priced outcome.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    /// Price if it is usable for arbitrage math.
    pub fn offered_price(&self) -> Option<Decimal> {
        self.price.filter(|p| *p > Decimal::ZERO)
    }
}

/// One market offered by a bookmaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Market key (e.g. "h2h").
    #[serde(default)]
    pub key: Option<String>,
    /// Outcomes in positional order. Individual entries may be null.
    #[serde(default)]
    pub outcomes: Option<Vec<Option<Outcome>>>,
}

/// One bookmaker's quote for an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmakerQuote {
    /// Bookmaker key (e.g. "bet365").
    #[serde(default)]
    pub key: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Last update reported by the bookmaker.
    #[serde(
        default,
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "lenient_timestamp"
    )]
    pub last_update: Option<OffsetDateTime>,
    /// Markets offered.
    #[serde(default)]
    pub markets: Option<Vec<Market>>,
}

impl BookmakerQuote {
    /// Create a single-market quote from positional outcomes.
    pub fn h2h(key: impl Into<String>, outcomes: Vec<Outcome>) -> Self {
        Self {
            key: Some(key.into()),
            title: None,
            last_update: None,
            markets: Some(vec![Market {
                key: Some(H2H_MARKET.to_string()),
                outcomes: Some(outcomes.into_iter().map(Some).collect()),
            }]),
        }
    }

    /// The head-to-head market, or the first market when none is keyed h2h.
    pub fn h2h_market(&self) -> Option<&Market> {
        let markets = self.markets.as_deref()?;
        markets
            .iter()
            .find(|m| m.key.as_deref() == Some(H2H_MARKET))
            .or_else(|| markets.first())
    }

    /// Positional outcomes of the head-to-head market (empty when absent).
    pub fn outcomes(&self) -> &[Option<Outcome>] {
        self.h2h_market()
            .and_then(|m| m.outcomes.as_deref())
            .unwrap_or(&[])
    }

    /// Usable price at a slot, if the bookmaker offers one.
    pub fn price(&self, slot: OutcomeSlot) -> Option<Decimal> {
        self.outcomes()
            .get(slot.position())
            .and_then(|o| o.as_ref())
            .and_then(Outcome::offered_price)
    }

    /// Bookmaker label: title, else key, else "unknown".
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.key.as_deref())
            .unwrap_or("unknown")
    }
}

/// A sporting fixture with its bookmaker quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Upstream event identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Sport key (e.g. "soccer_epl").
    #[serde(default)]
    pub sport_key: Option<String>,
    /// Sport display title.
    #[serde(default)]
    pub sport_title: Option<String>,
    /// Scheduled start time.
    #[serde(
        default,
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "lenient_timestamp"
    )]
    pub commence_time: Option<OffsetDateTime>,
    /// Home team name.
    #[serde(default)]
    pub home_team: Option<String>,
    /// Away team name.
    #[serde(default)]
    pub away_team: Option<String>,
    /// Bookmaker quotes.
    #[serde(default)]
    pub bookmakers: Vec<BookmakerQuote>,
}

impl Event {
    /// "Home vs Away" label.
    pub fn matchup(&self) -> String {
        format!(
            "{} vs {}",
            self.home_team.as_deref().unwrap_or("?"),
            self.away_team.as_deref().unwrap_or("?")
        )
    }
}

/// Sport listing entry from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    /// Sport key used in odds requests.
    pub key: String,
    /// Sport group (e.g. "Soccer").
    #[serde(default)]
    pub group: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the sport currently has events.
    #[serde(default)]
    pub active: bool,
    /// Whether the sport has outright markets.
    #[serde(default)]
    pub has_outrights: bool,
}

/// Accept a JSON number or numeric string; anything else reads as no price.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let price = match value {
        Some(serde_json::Value::Number(n)) => n.to_string().parse::<Decimal>().ok().or_else(|| {
            n.as_f64()
                .and_then(Decimal::from_f64_retain)
                .map(|d| d.normalize())
        }),
        Some(serde_json::Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(price.filter(|p| *p > Decimal::ZERO))
}

/// Accept an RFC 3339 string; anything else reads as no timestamp.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => OffsetDateTime::parse(s.trim(), &Rfc3339).ok(),
        _ => None,
    })
}
