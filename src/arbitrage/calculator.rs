//! Stake allocation and profit calculations for arbitrage opportunities.
//!
//! With best decimal prices `p_i`, the implied total is `Σ 1/p_i`. A split
//! exists iff that total is below one; staking `(stake / p_i) / total` on
//! each outcome returns `stake / total` whichever outcome wins.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use smallvec::SmallVec;

use super::prices::{BestPrices, MarketKind};
use crate::odds::OutcomeSlot;

/// Decimal places used for every presented amount.
const OUTPUT_DP: u32 = 2;

/// Stake placed on one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeLeg {
    /// Outcome backed.
    pub slot: OutcomeSlot,
    /// Price taken.
    pub price: Decimal,
    /// Amount staked on this outcome (rounded).
    pub stake: Decimal,
    /// Payout if this outcome wins (rounded).
    pub payout: Decimal,
}

/// Result of evaluating an event's best prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    /// Whether a guaranteed-profit split exists.
    pub arbitrage: bool,
    /// Market evaluated.
    pub market: MarketKind,
    /// Sum of inverse prices at full precision; zero when not evaluated.
    pub implied_total: Decimal,
    /// Guaranteed profit in percent of stake (rounded).
    pub profit_pct: Decimal,
    /// Sum of the per-outcome stakes (rounded).
    pub total_stake: Decimal,
    /// Guaranteed return whichever outcome wins (rounded).
    pub expected_return: Decimal,
    /// Per-outcome stakes.
    pub legs: SmallVec<[StakeLeg; 3]>,
}

impl Opportunity {
    /// The "no opportunity" result: every amount zero.
    pub fn none(market: MarketKind) -> Self {
        Self {
            arbitrage: false,
            market,
            implied_total: Decimal::ZERO,
            profit_pct: Decimal::ZERO,
            total_stake: Decimal::ZERO,
            expected_return: Decimal::ZERO,
            legs: SmallVec::new(),
        }
    }

    /// Guaranteed profit in currency units.
    pub fn profit(&self) -> Decimal {
        self.expected_return - self.total_stake
    }

    /// Whether this is an arbitrage whose presented profit meets the threshold.
    pub fn qualifies(&self, min_profit_pct: Decimal) -> bool {
        self.arbitrage && self.profit_pct >= min_profit_pct
    }
}

/// Round a presented amount to two decimal places.
pub fn round_output(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(OUTPUT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of inverse prices.
///
/// `None` when any price is zero or negative, or the sum is not
/// representable; such prices can never form an arbitrage.
pub fn implied_total(prices: &[Decimal]) -> Option<Decimal> {
    if prices.is_empty() {
        return None;
    }

    prices.iter().try_fold(Decimal::ZERO, |acc, &price| {
        if price <= Decimal::ZERO {
            return None;
        }
        acc.checked_add(Decimal::ONE.checked_div(price)?)
    })
}

/// Evaluate best prices without any profit threshold.
///
/// The validity flag is exactly `implied_total < 1`. Dispatches to a
/// three-way market when a draw price was observed.
pub fn calculate(best: &BestPrices, stake: Decimal) -> Opportunity {
    let market = best.market_kind();
    let legs = best.legs();
    let prices: SmallVec<[Decimal; 3]> = legs.iter().map(|(_, p)| *p).collect();

    let Some(total) = implied_total(&prices) else {
        return Opportunity::none(market);
    };

    if total >= Decimal::ONE || total <= Decimal::ZERO || stake <= Decimal::ZERO {
        return Opportunity::none(market);
    }

    allocate(market, &legs, total, stake).unwrap_or_else(|| Opportunity::none(market))
}

/// Evaluate best prices and apply the minimum-profit threshold.
///
/// Arbitrage whose full-precision profit falls below `min_profit_pct` is
/// reported as no opportunity.
pub fn evaluate(best: &BestPrices, stake: Decimal, min_profit_pct: Decimal) -> Opportunity {
    let opportunity = calculate(best, stake);

    match raw_profit_pct(opportunity.implied_total) {
        Some(profit) if opportunity.arbitrage && profit >= min_profit_pct => opportunity,
        _ => Opportunity::none(opportunity.market),
    }
}

/// Unrounded profit percentage for an implied total.
fn raw_profit_pct(total: Decimal) -> Option<Decimal> {
    Decimal::ONE
        .checked_sub(total)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Split `stake` across the legs so every outcome pays the same.
fn allocate(
    market: MarketKind,
    legs: &[(OutcomeSlot, Decimal)],
    total: Decimal,
    stake: Decimal,
) -> Option<Opportunity> {
    let mut stake_legs = SmallVec::new();
    let mut stake_used = Decimal::ZERO;

    for &(slot, price) in legs {
        let leg_stake = stake.checked_div(price)?.checked_div(total)?;
        let payout = leg_stake.checked_mul(price)?;
        stake_used = stake_used.checked_add(leg_stake)?;
        stake_legs.push(StakeLeg {
            slot,
            price,
            stake: round_output(leg_stake),
            payout: round_output(payout),
        });
    }

    let expected_return = stake.checked_div(total)?;
    let profit_pct = raw_profit_pct(total)?;

    Some(Opportunity {
        arbitrage: true,
        market,
        implied_total: total,
        profit_pct: round_output(profit_pct),
        total_stake: round_output(stake_used),
        expected_return: round_output(expected_return),
        legs: stake_legs,
    })
}
