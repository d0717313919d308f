//! Wizard state types.
//!
//! One [`CheckoutState`] value is the whole session: created at the first
//! step, mutated only by the reducer, reset on restart. It is deliberately
//! not serializable: an in-progress checkout does not survive a reload;
//! the backend's booking record, if one was created, lives on
//! independently.

use crate::error::CheckoutError;
use crate::pricing::{self, PricingError};
use crate::types::{BookingId, ContactInfo, PriceQuote, TicketSelection};
use crate::validation::FieldErrors;
use chrono::{DateTime, Utc};

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    /// Step 1: pick date, duration, tier and quantity.
    #[default]
    Selecting,

    /// Step 2: supply contact details.
    Contact,

    /// Step 3: review the order and start payment.
    Review,

    /// Step 4: terminal confirmation screen.
    Confirmed,
}

impl WizardStep {
    /// One-based step number as shown in the progress header.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Selecting => 1,
            Self::Contact => 2,
            Self::Review => 3,
            Self::Confirmed => 4,
        }
    }

    /// The step a back navigation returns to, when one exists.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Contact => Some(Self::Selecting),
            Self::Review => Some(Self::Contact),
            Self::Selecting | Self::Confirmed => None,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selecting => write!(f, "Selecting"),
            Self::Contact => write!(f, "Contact"),
            Self::Review => write!(f, "Review"),
            Self::Confirmed => write!(f, "Confirmed"),
        }
    }
}

/// The complete state of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutState {
    /// Current wizard step.
    pub step: WizardStep,

    /// Draft ticket selection (step 1).
    pub selection: TicketSelection,

    /// Draft contact details (step 2).
    pub contact: ContactInfo,

    /// Booking reference once the backend issued one.
    pub booking_id: Option<BookingId>,

    /// Set while exactly one transition request is in flight. The sole
    /// mutual-exclusion guard: a submit arriving while this is set is
    /// ignored, never queued.
    pub is_submitting: bool,

    /// Inline messages from the last failed gate, keyed by field.
    pub field_errors: FieldErrors,

    /// The last non-field failure (backend, gateway, confirmation).
    pub last_error: Option<CheckoutError>,

    /// When the booking reached the confirmed step.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl CheckoutState {
    /// A fresh session at step 1 with default selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Price breakdown for the current selection.
    ///
    /// Derived on demand, never stored.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidTier`] while the draft names a tier
    /// that is not sold for the chosen duration.
    pub fn quote(&self) -> Result<PriceQuote, PricingError> {
        pricing::quote(
            self.selection.duration,
            self.selection.tier,
            self.selection.quantity,
        )
    }

    /// Tickets still missing before the bulk rate unlocks, when close.
    #[must_use]
    pub const fn bulk_hint(&self) -> Option<u32> {
        pricing::remaining_for_bulk(self.selection.duration, self.selection.quantity)
    }

    /// Whether the session is in the terminal step.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.step == WizardStep::Confirmed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{DurationClass, TierCode};

    #[test]
    fn steps_are_numbered_in_order() {
        assert_eq!(WizardStep::Selecting.number(), 1);
        assert_eq!(WizardStep::Contact.number(), 2);
        assert_eq!(WizardStep::Review.number(), 3);
        assert_eq!(WizardStep::Confirmed.number(), 4);
    }

    #[test]
    fn back_navigation_only_exists_for_middle_steps() {
        assert_eq!(WizardStep::Selecting.previous(), None);
        assert_eq!(WizardStep::Contact.previous(), Some(WizardStep::Selecting));
        assert_eq!(WizardStep::Review.previous(), Some(WizardStep::Contact));
        assert_eq!(WizardStep::Confirmed.previous(), None);
    }

    #[test]
    fn fresh_session_starts_clean() {
        let state = CheckoutState::new();
        assert_eq!(state.step, WizardStep::Selecting);
        assert!(state.booking_id.is_none());
        assert!(!state.is_submitting);
        assert!(state.field_errors.is_empty());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn quote_follows_the_draft_selection() {
        let mut state = CheckoutState::new();
        state.selection.duration = DurationClass::SingleDay;
        state.selection.tier = TierCode::Female;
        state.selection.quantity = 6;

        let quote = state.quote().unwrap();
        assert_eq!(quote.total_amount, 1800);
        assert!(quote.bulk_discount_applied);
    }
}
