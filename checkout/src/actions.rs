//! Checkout actions.
//!
//! This module defines all possible inputs to the wizard reducer.
//! Actions follow the CQRS split: Commands (user intent) and Events
//! (results of async operations, produced by effects).
//!
//! Actions are the **only** way to move the wizard. The reducer is a pure
//! function: `(State, Action, Env) → (State, Effects)`.

use crate::error::CheckoutError;
use crate::providers::{GatewayReceipt, PaymentOrder};
use crate::types::{BookingId, DurationClass, TierCode};

/// Every input the wizard reducer accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutAction {
    // ═══════════════════════════════════════════════════════════════════
    // Field edits (commands)
    // ═══════════════════════════════════════════════════════════════════
    /// Set the event date (step 1).
    SetEventDate(String),

    /// Switch between single day and season pass (step 1).
    ///
    /// Switching resets the tier to the default, since the tier sets
    /// differ between durations.
    SetDuration(DurationClass),

    /// Pick a ticket tier (step 1).
    SetTier(TierCode),

    /// Set the number of tickets (step 1).
    SetQuantity(u32),

    /// Set the full name (step 2).
    SetFullName(String),

    /// Set the email address (step 2).
    SetEmail(String),

    /// Set the phone number (step 2). Non-digits are dropped as typed.
    SetPhone(String),

    // ═══════════════════════════════════════════════════════════════════
    // Step commands
    // ═══════════════════════════════════════════════════════════════════
    /// Submit the ticket selection and create the booking.
    ///
    /// # Flow
    ///
    /// 1. Validation gate over the selection
    /// 2. `create_booking` on the backend
    /// 3. [`CheckoutAction::BookingCreated`] or
    ///    [`CheckoutAction::BookingFailed`] comes back
    SubmitSelection,

    /// Submit contact details for the existing booking.
    ///
    /// Fails closed (no request issued) when no booking reference exists.
    SubmitContact,

    /// Start the payment leg from the review step.
    ///
    /// # Flow
    ///
    /// 1. `create_payment_order` on the backend
    /// 2. Either the bypass event (email already sent) or an order
    /// 3. Gateway widget opens, signed receipt comes back
    /// 4. `confirm_payment` on the backend finalizes the booking
    StartPayment,

    /// Go back one step (Contact → Selecting, Review → Contact).
    GoBack,

    /// Abandon the session and return to a fresh step 1.
    ///
    /// The only way out of the confirmed step.
    Reset,

    // ═══════════════════════════════════════════════════════════════════
    // Backend events
    // ═══════════════════════════════════════════════════════════════════
    /// The backend issued a booking reference.
    BookingCreated {
        /// The new booking.
        booking_id: BookingId,
    },

    /// The booking could not be created.
    BookingFailed {
        /// Why.
        error: CheckoutError,
    },

    /// The backend accepted the contact details.
    ContactSaved,

    /// The backend refused the contact details.
    ContactRejected {
        /// Why.
        error: CheckoutError,
    },

    /// The backend created a payment order for the gateway.
    PaymentOrderReady {
        /// Order to hand to the gateway widget.
        order: PaymentOrder,
    },

    /// The payment order could not be created.
    PaymentOrderFailed {
        /// Why.
        error: CheckoutError,
    },

    /// The backend already dispatched the confirmation email; no payment
    /// interaction is required. Keyed exclusively off the backend's
    /// explicit flag, never inferred client-side.
    ConfirmationBypassed,

    // ═══════════════════════════════════════════════════════════════════
    // Gateway events
    // ═══════════════════════════════════════════════════════════════════
    /// The gateway captured the charge and returned its signed result.
    GatewayApproved {
        /// Signed result, relayed to the backend untouched.
        receipt: GatewayReceipt,
    },

    /// The gateway widget failed to load or reported a failure.
    GatewayFailed {
        /// Why.
        error: CheckoutError,
    },

    /// The backend verified the gateway result and finalized the booking.
    PaymentConfirmed,

    /// The gateway reported success but the backend refused to confirm.
    /// Money may have moved; surfaced distinctly, never as a generic
    /// failure.
    ConfirmationFailed {
        /// Always [`CheckoutError::PaymentNotConfirmed`].
        error: CheckoutError,
    },
}
