//! Best-price aggregation across bookmaker quotes.

use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;
use strum::Display;

use crate::odds::{BookmakerQuote, OutcomeSlot};

/// Whether an event is priced as a two-way or three-way market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarketKind {
    /// Home / away only.
    TwoWay,
    /// Home / draw / away.
    ThreeWay,
}

/// Best price for one outcome slot and who offers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestPrice {
    /// Highest price observed; zero when no bookmaker offers the slot.
    pub price: Decimal,
    /// Key of the bookmaker offering that price.
    pub bookmaker: Option<String>,
}

impl BestPrice {
    /// Whether any bookmaker offered this slot.
    pub fn is_offered(&self) -> bool {
        self.price > Decimal::ZERO
    }

    /// Fold in one observation. Ties go to the smaller bookmaker key.
    fn observe(&mut self, price: Decimal, bookmaker: Option<&str>) {
        let better = price > self.price
            || (price == self.price
                && match (bookmaker, self.bookmaker.as_deref()) {
                    (Some(new), Some(current)) => new < current,
                    (Some(_), None) => true,
                    _ => false,
                });

        if better {
            self.price = price;
            self.bookmaker = bookmaker.map(str::to_string);
        }
    }
}

/// Maximum price per outcome slot across all quotes of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestPrices {
    /// First side.
    pub home: BestPrice,
    /// Second side.
    pub away: BestPrice,
    /// Draw; zero price means no three-way market was observed.
    pub draw: BestPrice,
}

impl BestPrices {
    /// Build from bare prices (zero = not offered).
    pub fn from_prices(home: Decimal, away: Decimal, draw: Decimal) -> Self {
        let slot = |price| BestPrice {
            price,
            bookmaker: None,
        };
        Self {
            home: slot(home),
            away: slot(away),
            draw: slot(draw),
        }
    }

    /// Best entry for a slot.
    pub fn get(&self, slot: OutcomeSlot) -> &BestPrice {
        match slot {
            OutcomeSlot::Home => &self.home,
            OutcomeSlot::Away => &self.away,
            OutcomeSlot::Draw => &self.draw,
        }
    }

    fn get_mut(&mut self, slot: OutcomeSlot) -> &mut BestPrice {
        match slot {
            OutcomeSlot::Home => &mut self.home,
            OutcomeSlot::Away => &mut self.away,
            OutcomeSlot::Draw => &mut self.draw,
        }
    }

    /// Best price for a slot (zero when not offered).
    pub fn price(&self, slot: OutcomeSlot) -> Decimal {
        self.get(slot).price
    }

    /// Market kind implied by the draw slot.
    pub fn market_kind(&self) -> MarketKind {
        if self.draw.is_offered() {
            MarketKind::ThreeWay
        } else {
            MarketKind::TwoWay
        }
    }

    /// Slots that must be backed, with their best prices.
    ///
    /// Three-way markets are listed home, draw, away.
    pub fn legs(&self) -> SmallVec<[(OutcomeSlot, Decimal); 3]> {
        let slots: &[OutcomeSlot] = match self.market_kind() {
            MarketKind::TwoWay => &[OutcomeSlot::Home, OutcomeSlot::Away],
            MarketKind::ThreeWay => &[OutcomeSlot::Home, OutcomeSlot::Draw, OutcomeSlot::Away],
        };
        slots.iter().map(|&s| (s, self.price(s))).collect()
    }
}

/// Reduce bookmaker quotes to the best price per outcome slot.
///
/// Missing markets, null outcomes and absent or non-positive prices are
/// skipped. Outcomes past the draw position are ignored. The result only
/// depends on the set of quotes, not their order.
pub fn best_prices(quotes: &[BookmakerQuote]) -> BestPrices {
    let mut best = BestPrices::default();

    for quote in quotes {
        for slot in OutcomeSlot::ALL {
            if let Some(price) = quote.price(slot) {
                best.get_mut(slot).observe(price, quote.key.as_deref());
            }
        }
    }

    best
}
