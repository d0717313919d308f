//! Checkout providers.
//!
//! This module defines traits for the two external collaborators of the
//! wizard: the booking backend (source of truth for bookings and payments)
//! and the payment gateway widget. The reducer depends on these traits
//! only; the runtime wires in concrete implementations.
//!
//! This enables:
//! - **Testing**: mocks (in-memory, deterministic, call-counting)
//! - **Production**: the HTTP backend client and the gateway SDK bridge

use crate::error::Result;
use crate::types::{BookingId, ContactInfo, TicketSelection};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub mod gateway;
pub mod http;

pub use gateway::{GatewayBridge, GatewaySdk, SdkLoader};
pub use http::HttpBookingBackend;

// ═══════════════════════════════════════════════════════════════════════
// Booking backend wire types
// ═══════════════════════════════════════════════════════════════════════

/// Request body for creating a booking from a ticket selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Chosen event date (`YYYY-MM-DD`).
    pub booking_date: String,

    /// Number of tickets.
    pub num_tickets: u32,

    /// Tier code (`female`, `couple`, ...).
    pub pass_type: String,

    /// Duration code (`single` or `season`).
    pub ticket_type: String,
}

impl From<&TicketSelection> for CreateBookingRequest {
    fn from(selection: &TicketSelection) -> Self {
        Self {
            booking_date: selection.event_date.trim().to_string(),
            num_tickets: selection.quantity,
            pass_type: selection.tier.wire_code().to_string(),
            ticket_type: selection.duration.wire_code().to_string(),
        }
    }
}

/// A booking reference freshly issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBooking {
    /// Identifier of the new booking record.
    pub id: BookingId,
}

/// Request body attaching contact details to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    /// Booking the contact belongs to.
    pub booking_id: BookingId,

    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number, digits only.
    pub phone: String,
}

impl ContactRequest {
    /// Build the request for a validated contact.
    #[must_use]
    pub fn new(booking_id: BookingId, contact: &ContactInfo) -> Self {
        Self {
            booking_id,
            name: contact.full_name.trim().to_string(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        }
    }
}

/// Request body asking the backend for a gateway payment order.
///
/// No amount travels client-to-server; the backend computes the charge
/// from the booking record it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrderRequest {
    /// Booking to pay for.
    pub booking_id: BookingId,

    /// Email used to prefill and notify.
    #[serde(rename = "userEmail")]
    pub user_email: String,

    /// Name used to prefill and notify.
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// A payment order created by the backend with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Gateway order identifier.
    pub id: String,

    /// Amount to charge, in the gateway's minor units.
    pub amount: u64,

    /// ISO currency code.
    pub currency: String,
}

/// Outcome of a payment-order request.
///
/// The backend may report that the confirmation email already went out
/// (zero-amount or pre-authorized bookings); in that case no order is
/// returned and the widget is never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrderOutcome {
    /// The order to put through the gateway, absent when bypassed.
    pub order: Option<PaymentOrder>,

    /// Set when the backend already dispatched the confirmation email.
    pub email_sent: bool,
}

/// Request body handing the gateway's signed result to the backend for
/// verification and final confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    /// Booking being confirmed.
    pub booking_id: BookingId,

    /// Gateway order identifier.
    pub gateway_order_id: String,

    /// Gateway payment identifier.
    pub gateway_payment_id: String,

    /// Gateway signature over order and payment ids. Verified exclusively
    /// by the backend.
    pub gateway_signature: String,
}

/// The booking backend consumed by the wizard.
///
/// Four operations, one per wizard transition. Implementations map
/// transport failures to [`crate::CheckoutError::BackendUnavailable`] and
/// structured rejections to [`crate::CheckoutError::BackendRejected`].
pub trait BookingBackend: Send + Sync {
    /// Create a booking for a validated ticket selection.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the booking or cannot be
    /// reached.
    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> impl Future<Output = Result<CreatedBooking>> + Send;

    /// Attach validated contact details to a booking.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the contact or cannot be
    /// reached.
    fn add_contact(&self, request: ContactRequest) -> impl Future<Output = Result<()>> + Send;

    /// Ask the backend to create a gateway payment order for a booking.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the request or cannot be
    /// reached.
    fn create_payment_order(
        &self,
        request: PaymentOrderRequest,
    ) -> impl Future<Output = Result<PaymentOrderOutcome>> + Send;

    /// Hand the gateway's signed result to the backend for verification.
    ///
    /// # Errors
    ///
    /// Returns an error when verification fails or the backend cannot be
    /// reached. Callers treat any failure here as payment-critical.
    fn confirm_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> impl Future<Output = Result<()>> + Send;
}

// ═══════════════════════════════════════════════════════════════════════
// Payment gateway types
// ═══════════════════════════════════════════════════════════════════════

/// Contact fields prefilled into the payment widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prefill {
    /// Payer name.
    pub name: String,

    /// Payer email.
    pub email: String,

    /// Payer phone number.
    pub contact: String,
}

/// Everything the gateway widget needs to present a checkout.
///
/// Assembled from the backend-issued order plus configuration and the
/// collected contact details; the wizard never invents an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSheet {
    /// Merchant key identifying this deployment to the gateway.
    pub key_id: String,

    /// Backend-created gateway order id.
    pub order_id: String,

    /// Amount in the gateway's minor units.
    pub amount: u64,

    /// ISO currency code.
    pub currency: String,

    /// Event name shown in the widget header.
    pub event_label: String,

    /// Order description shown in the widget.
    pub description: String,

    /// Prefilled contact fields.
    pub prefill: Prefill,
}

/// The signed result the gateway hands back after a successful charge.
///
/// An opaque relay: signature verification is exclusively a backend
/// responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReceipt {
    /// Gateway order identifier.
    pub order_id: String,

    /// Gateway payment identifier.
    pub payment_id: String,

    /// Gateway signature over order and payment ids.
    pub signature: String,
}

/// The payment gateway widget consumed by the wizard.
///
/// `open` resolves when the gateway reports a successful charge, or fails
/// with [`crate::CheckoutError::GatewayLoad`] when the widget cannot be
/// brought up.
pub trait PaymentGateway: Send + Sync {
    /// Present the checkout sheet and wait for the signed result.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway SDK cannot be loaded or the
    /// widget reports a failure.
    fn open(&self, sheet: CheckoutSheet) -> impl Future<Output = Result<GatewayReceipt>> + Send;
}
