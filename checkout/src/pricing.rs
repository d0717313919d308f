//! Pricing engine for ticket quotes.
//!
//! A pure function from (duration, tier, quantity) to a price breakdown.
//! All prices are integer currency units; totals are exact products, so
//! there is no rounding anywhere in the engine.
//!
//! # Rules
//!
//! - Every legal (duration, tier) pair has a fixed base unit price.
//! - Single-day bookings of [`BULK_THRESHOLD`] or more tickets drop to the
//!   flat [`BULK_UNIT_PRICE`] per ticket.
//! - Season passes are never discounted.
//! - The bulk rate only applies where it actually lowers the price: the
//!   Kids tier is already below the flat rate and keeps its base price.

use crate::types::{DurationClass, PriceQuote, TierCode};
use thiserror::Error;

/// Minimum single-day quantity that unlocks the bulk rate.
pub const BULK_THRESHOLD: u32 = 6;

/// Flat per-ticket price once the bulk threshold is reached.
pub const BULK_UNIT_PRICE: u32 = 300;

/// Errors produced by the pricing engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// The tier is not sold for the requested duration.
    #[error("{tier} tickets are not offered as a {duration}")]
    InvalidTier {
        /// Requested duration class.
        duration: DurationClass,
        /// Requested tier.
        tier: TierCode,
    },
}

/// Base unit price for a (duration, tier) pair, `None` for pairs not sold.
#[must_use]
pub const fn base_price(duration: DurationClass, tier: TierCode) -> Option<u32> {
    match (duration, tier) {
        (DurationClass::SingleDay, TierCode::Female) => Some(399),
        (DurationClass::SingleDay, TierCode::Male | TierCode::Couple) => Some(699),
        (DurationClass::SingleDay, TierCode::Kids) => Some(99),
        (DurationClass::SingleDay, TierCode::Family) => Some(1300),
        (DurationClass::SeasonPass, TierCode::Female) => Some(2499),
        (DurationClass::SeasonPass, TierCode::Couple) => Some(3499),
        (DurationClass::SeasonPass, TierCode::Family) => Some(5999),
        (DurationClass::SeasonPass, TierCode::Male | TierCode::Kids) => None,
    }
}

/// Compute the price breakdown for a selection.
///
/// Pure and idempotent: the same inputs always produce the same quote.
/// Quantity zero is rejected by the validation gate before a quote is ever
/// requested; the engine itself prices it as zero tickets without error.
///
/// # Errors
///
/// Returns [`PricingError::InvalidTier`] when the tier is not sold for the
/// duration (season passes have no Male or Kids tier).
pub fn quote(
    duration: DurationClass,
    tier: TierCode,
    quantity: u32,
) -> Result<PriceQuote, PricingError> {
    let base = base_price(duration, tier).ok_or(PricingError::InvalidTier { duration, tier })?;

    let bulk = duration == DurationClass::SingleDay
        && quantity >= BULK_THRESHOLD
        && base > BULK_UNIT_PRICE;

    let unit_price = if bulk { BULK_UNIT_PRICE } else { base };
    let total_amount = u64::from(unit_price) * u64::from(quantity);
    let savings = if bulk {
        u64::from(base - BULK_UNIT_PRICE) * u64::from(quantity)
    } else {
        0
    };

    Ok(PriceQuote {
        unit_price,
        total_amount,
        bulk_discount_applied: bulk,
        savings,
        original_unit_price: bulk.then_some(base),
    })
}

/// Tickets still missing before the bulk rate unlocks.
///
/// Returns `Some(remaining)` for single-day selections close enough to the
/// threshold to be worth nudging (three tickets or more), `None` otherwise.
#[must_use]
pub const fn remaining_for_bulk(duration: DurationClass, quantity: u32) -> Option<u32> {
    match duration {
        DurationClass::SingleDay if quantity >= 3 && quantity < BULK_THRESHOLD => {
            Some(BULK_THRESHOLD - quantity)
        }
        _ => None,
    }
}

/// Customer-facing label for a tier at its base price, e.g. `Female - ₹399`.
///
/// Returns `None` for pairs that are not sold.
#[must_use]
pub fn display_label(duration: DurationClass, tier: TierCode) -> Option<String> {
    let base = base_price(duration, tier)?;
    Some(match duration {
        DurationClass::SingleDay => format!("{tier} - ₹{base}"),
        DurationClass::SeasonPass => format!("Season Pass - {tier} (8 Days) - ₹{base}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SINGLE_DAY_TIERS: [(TierCode, u32); 5] = [
        (TierCode::Female, 399),
        (TierCode::Male, 699),
        (TierCode::Couple, 699),
        (TierCode::Kids, 99),
        (TierCode::Family, 1300),
    ];

    const SEASON_TIERS: [(TierCode, u32); 3] = [
        (TierCode::Female, 2499),
        (TierCode::Couple, 3499),
        (TierCode::Family, 5999),
    ];

    #[test]
    fn below_threshold_charges_base_price() {
        for (tier, base) in SINGLE_DAY_TIERS {
            for quantity in 1..BULK_THRESHOLD {
                let quote = quote(DurationClass::SingleDay, tier, quantity).unwrap();
                assert_eq!(quote.unit_price, base, "{tier} x{quantity}");
                assert!(!quote.bulk_discount_applied);
                assert_eq!(quote.savings, 0);
                assert_eq!(quote.original_unit_price, None);
            }
        }
    }

    #[test]
    fn threshold_quantity_receives_the_discount() {
        for (tier, base) in SINGLE_DAY_TIERS {
            if base <= BULK_UNIT_PRICE {
                continue; // Kids stays at its base price, covered below
            }
            let quote = quote(DurationClass::SingleDay, tier, BULK_THRESHOLD).unwrap();
            assert_eq!(quote.unit_price, BULK_UNIT_PRICE);
            assert!(quote.bulk_discount_applied);
            assert_eq!(
                quote.savings,
                u64::from(base - BULK_UNIT_PRICE) * u64::from(BULK_THRESHOLD)
            );
            assert_eq!(quote.original_unit_price, Some(base));
            assert!(quote.savings > 0);
        }
    }

    #[test]
    fn one_below_threshold_is_not_discounted() {
        let quote = quote(DurationClass::SingleDay, TierCode::Female, BULK_THRESHOLD - 1).unwrap();
        assert_eq!(quote.unit_price, 399);
        assert!(!quote.bulk_discount_applied);
    }

    #[test]
    fn kids_tier_never_pays_more_than_its_base_price() {
        // The flat bulk rate is above the Kids base price; applying it
        // would raise the total, so the quote keeps the base rate.
        let quote = quote(DurationClass::SingleDay, TierCode::Kids, 10).unwrap();
        assert_eq!(quote.unit_price, 99);
        assert!(!quote.bulk_discount_applied);
        assert_eq!(quote.total_amount, 990);
    }

    #[test]
    fn season_pass_is_never_discounted() {
        for (tier, base) in SEASON_TIERS {
            for quantity in [1, 5, 6, 40] {
                let quote = quote(DurationClass::SeasonPass, tier, quantity).unwrap();
                assert_eq!(quote.unit_price, base);
                assert!(!quote.bulk_discount_applied);
                assert_eq!(quote.savings, 0);
            }
        }
    }

    #[test]
    fn total_is_always_unit_times_quantity() {
        for (tier, _) in SINGLE_DAY_TIERS {
            for quantity in 1..20 {
                let quote = quote(DurationClass::SingleDay, tier, quantity).unwrap();
                assert_eq!(
                    quote.total_amount,
                    u64::from(quote.unit_price) * u64::from(quantity)
                );
            }
        }
    }

    #[test]
    fn repeated_quotes_are_identical() {
        let first = quote(DurationClass::SingleDay, TierCode::Couple, 7).unwrap();
        let second = quote(DurationClass::SingleDay, TierCode::Couple, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn undefined_pairs_are_rejected() {
        for tier in [TierCode::Male, TierCode::Kids] {
            let result = quote(DurationClass::SeasonPass, tier, 1);
            assert_eq!(
                result,
                Err(PricingError::InvalidTier {
                    duration: DurationClass::SeasonPass,
                    tier,
                })
            );
        }
    }

    #[test]
    fn six_female_single_day_bulk_breakdown() {
        let quote = quote(DurationClass::SingleDay, TierCode::Female, 6).unwrap();
        assert_eq!(quote.unit_price, 300);
        assert_eq!(quote.total_amount, 1800);
        assert!(quote.bulk_discount_applied);
        assert_eq!(quote.savings, 594);
        assert_eq!(quote.original_unit_price, Some(399));
    }

    #[test]
    fn bulk_nudge_kicks_in_close_to_the_threshold() {
        assert_eq!(remaining_for_bulk(DurationClass::SingleDay, 2), None);
        assert_eq!(remaining_for_bulk(DurationClass::SingleDay, 3), Some(3));
        assert_eq!(remaining_for_bulk(DurationClass::SingleDay, 5), Some(1));
        assert_eq!(remaining_for_bulk(DurationClass::SingleDay, 6), None);
        assert_eq!(remaining_for_bulk(DurationClass::SeasonPass, 4), None);
    }

    #[test]
    fn labels_carry_the_base_price() {
        assert_eq!(
            display_label(DurationClass::SingleDay, TierCode::Female).unwrap(),
            "Female - ₹399"
        );
        assert_eq!(
            display_label(DurationClass::SeasonPass, TierCode::Family).unwrap(),
            "Season Pass - Family (4 members) (8 Days) - ₹5999"
        );
        assert_eq!(display_label(DurationClass::SeasonPass, TierCode::Kids), None);
    }
}
