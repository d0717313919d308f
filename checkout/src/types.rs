//! Core domain types for the checkout wizard.
//!
//! All types are `Clone` to support the functional architecture pattern.

use serde::{Deserialize, Serialize};

/// Whether a ticket covers a single event day or the full multi-day season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DurationClass {
    /// One event day.
    #[default]
    SingleDay,

    /// The full 8-day season.
    SeasonPass,
}

impl DurationClass {
    /// Ticket tiers that can be purchased for this duration.
    ///
    /// The season pass is not sold in the `Male` and `Kids` tiers.
    #[must_use]
    pub const fn tiers(self) -> &'static [TierCode] {
        match self {
            Self::SingleDay => &[
                TierCode::Female,
                TierCode::Male,
                TierCode::Couple,
                TierCode::Kids,
                TierCode::Family,
            ],
            Self::SeasonPass => &[TierCode::Female, TierCode::Couple, TierCode::Family],
        }
    }

    /// Whether `tier` can be purchased for this duration.
    #[must_use]
    pub fn allows(self, tier: TierCode) -> bool {
        self.tiers().contains(&tier)
    }

    /// The code this duration travels under on the booking API.
    #[must_use]
    pub const fn wire_code(self) -> &'static str {
        match self {
            Self::SingleDay => "single",
            Self::SeasonPass => "season",
        }
    }
}

impl std::fmt::Display for DurationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleDay => write!(f, "Single Day"),
            Self::SeasonPass => write!(f, "Season Pass"),
        }
    }
}

/// A named ticket category with its own base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TierCode {
    /// Female entry.
    #[default]
    Female,

    /// Male entry.
    Male,

    /// Couple entry (two people).
    Couple,

    /// Kids entry (6-12 yrs).
    Kids,

    /// Family entry (4 members).
    Family,
}

impl TierCode {
    /// The code this tier travels under on the booking API.
    #[must_use]
    pub const fn wire_code(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Couple => "couple",
            Self::Kids => "kids",
            Self::Family => "family",
        }
    }
}

impl std::fmt::Display for TierCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
            Self::Couple => write!(f, "Couple"),
            Self::Kids => write!(f, "Kids (6-12 yrs)"),
            Self::Family => write!(f, "Family (4 members)"),
        }
    }
}

/// The visitor's ticket choice: date, duration, tier and quantity.
///
/// The draft lives in wizard state from the first step on; the validation
/// gate decides when it is complete enough to book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSelection {
    /// Chosen event date as entered (`YYYY-MM-DD`).
    pub event_date: String,

    /// Single day or season pass.
    pub duration: DurationClass,

    /// Ticket tier.
    pub tier: TierCode,

    /// Number of tickets. The gate rejects zero; no upper bound is imposed.
    pub quantity: u32,
}

impl Default for TicketSelection {
    fn default() -> Self {
        Self {
            event_date: String::new(),
            duration: DurationClass::SingleDay,
            tier: TierCode::Female,
            quantity: 1,
        }
    }
}

/// Contact details collected in the second wizard step.
///
/// Held as entered; the validation gate rejects the whole entity when any
/// field fails, nothing is stored partially on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactInfo {
    /// Full name of the ticket holder.
    pub full_name: String,

    /// Email address the tickets are sent to.
    pub email: String,

    /// Phone number, digits only.
    pub phone: String,
}

/// Opaque reference to a booking record owned by the backend.
///
/// The wizard never inspects the identifier, it only hands it back on
/// subsequent calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wrap a backend-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A derived price breakdown for a ticket selection.
///
/// Quotes are recomputed from the selection on demand and never stored
/// independently; the backend recomputes the charge server-side from the
/// booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Price per ticket after any discount.
    pub unit_price: u32,

    /// `unit_price` × quantity.
    pub total_amount: u64,

    /// Whether the bulk rate was applied.
    pub bulk_discount_applied: bool,

    /// Total saved versus the base rate. Zero when no discount applied.
    pub savings: u64,

    /// The base per-ticket price, present only when a discount applied.
    pub original_unit_price: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_pass_excludes_male_and_kids() {
        assert!(!DurationClass::SeasonPass.allows(TierCode::Male));
        assert!(!DurationClass::SeasonPass.allows(TierCode::Kids));
        assert!(DurationClass::SeasonPass.allows(TierCode::Female));
        assert!(DurationClass::SeasonPass.allows(TierCode::Couple));
        assert!(DurationClass::SeasonPass.allows(TierCode::Family));
    }

    #[test]
    fn single_day_allows_every_tier() {
        for tier in [
            TierCode::Female,
            TierCode::Male,
            TierCode::Couple,
            TierCode::Kids,
            TierCode::Family,
        ] {
            assert!(DurationClass::SingleDay.allows(tier));
        }
    }

    #[test]
    fn wire_codes_match_the_booking_api() {
        assert_eq!(DurationClass::SingleDay.wire_code(), "single");
        assert_eq!(DurationClass::SeasonPass.wire_code(), "season");
        assert_eq!(TierCode::Female.wire_code(), "female");
        assert_eq!(TierCode::Family.wire_code(), "family");
    }

    #[test]
    fn default_selection_starts_with_one_female_single_day_ticket() {
        let selection = TicketSelection::default();
        assert_eq!(selection.duration, DurationClass::SingleDay);
        assert_eq!(selection.tier, TierCode::Female);
        assert_eq!(selection.quantity, 1);
        assert!(selection.event_date.is_empty());
    }
}
