//! Vehicle price tiers derived from a comparable-listing population.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ValuationPolicy;

use super::NormalizeError;

/// The three conventional price tiers for a vehicle.
///
/// Trade-in and retail are modeled as fixed offsets from the observed market
/// mean (the configured spread), not separately queried: trade-in below the
/// mean, retail above it. The ordering invariant `trade_in <= private_party
/// <= retail` holds whenever the spread factors straddle 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleTiers {
    pub trade_in: Decimal,
    pub private_party: Decimal,
    pub retail: Decimal,
}

/// Compute price tiers from raw listing prices.
///
/// Non-positive prices are discarded; the rest are sorted ascending and
/// averaged. Tiers are rounded to whole dollars.
///
/// # Errors
///
/// Returns [`NormalizeError::NoComparableListings`] when no positive price
/// survives filtering - no valuation is possible then, and no result row
/// should be persisted.
pub fn price_tiers(
    prices: &[Decimal],
    policy: &ValuationPolicy,
) -> Result<VehicleTiers, NormalizeError> {
    let mut valid: Vec<Decimal> = prices
        .iter()
        .copied()
        .filter(|p| p.is_sign_positive() && !p.is_zero())
        .collect();

    if valid.is_empty() {
        return Err(NormalizeError::NoComparableListings);
    }

    valid.sort_unstable();

    let sum: Decimal = valid.iter().copied().sum();
    let mean = sum / Decimal::from(valid.len());

    Ok(VehicleTiers {
        trade_in: round_dollars(mean * policy.trade_in_factor),
        private_party: round_dollars(mean),
        retail: round_dollars(mean * policy.retail_factor),
    })
}

/// Round to whole dollars, halves away from zero.
fn round_dollars(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
