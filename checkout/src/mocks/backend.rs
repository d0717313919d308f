//! Mock booking backend for testing.

use crate::error::{CheckoutError, Result};
use crate::pricing;
use crate::providers::{
    BookingBackend, ContactRequest, CreateBookingRequest, CreatedBooking, PaymentConfirmation,
    PaymentOrder, PaymentOrderOutcome, PaymentOrderRequest,
};
use crate::types::{BookingId, DurationClass, TierCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted booking backend.
///
/// Succeeds on every operation by default; individual operations can be
/// scripted to fail, respond after a delay, or report the email-bypass
/// branch. Clones share all recordings and counters.
#[derive(Debug, Clone, Default)]
pub struct MockBookingBackend {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    booking_id: Mutex<String>,
    latency: Mutex<Option<Duration>>,
    email_sent: Mutex<bool>,
    fail_create: Mutex<Option<CheckoutError>>,
    fail_contact: Mutex<Option<CheckoutError>>,
    fail_order: Mutex<Option<CheckoutError>>,
    fail_confirm: Mutex<Option<CheckoutError>>,

    create_calls: AtomicUsize,
    contact_calls: AtomicUsize,
    order_calls: AtomicUsize,
    confirm_calls: AtomicUsize,

    create_requests: Mutex<Vec<CreateBookingRequest>>,
    contact_requests: Mutex<Vec<ContactRequest>>,
    order_requests: Mutex<Vec<PaymentOrderRequest>>,
    confirmations: Mutex<Vec<PaymentConfirmation>>,
}

impl MockBookingBackend {
    /// Create a backend where every operation succeeds.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.inner.booking_id.lock().unwrap() = "bk-1".to_string();
        backend
    }

    /// Use a specific booking identifier for created bookings.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn with_booking_id(self, id: impl Into<String>) -> Self {
        *self.inner.booking_id.lock().unwrap() = id.into();
        self
    }

    /// Delay every response, for exercising in-flight behavior.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.inner.latency.lock().unwrap() = Some(latency);
        self
    }

    /// Report the email-bypass branch instead of a payment order.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn with_email_already_sent(self) -> Self {
        *self.inner.email_sent.lock().unwrap() = true;
        self
    }

    /// Fail `create_booking` with the given error.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn failing_create_booking(self, error: CheckoutError) -> Self {
        *self.inner.fail_create.lock().unwrap() = Some(error);
        self
    }

    /// Fail `add_contact` with the given error.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn failing_add_contact(self, error: CheckoutError) -> Self {
        *self.inner.fail_contact.lock().unwrap() = Some(error);
        self
    }

    /// Fail `create_payment_order` with the given error.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn failing_create_payment_order(self, error: CheckoutError) -> Self {
        *self.inner.fail_order.lock().unwrap() = Some(error);
        self
    }

    /// Fail `confirm_payment` with the given error.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn failing_confirm_payment(self, error: CheckoutError) -> Self {
        *self.inner.fail_confirm.lock().unwrap() = Some(error);
        self
    }

    /// Number of `create_booking` calls received.
    #[must_use]
    pub fn create_booking_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `add_contact` calls received.
    #[must_use]
    pub fn add_contact_calls(&self) -> usize {
        self.inner.contact_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_payment_order` calls received.
    #[must_use]
    pub fn create_payment_order_calls(&self) -> usize {
        self.inner.order_calls.load(Ordering::SeqCst)
    }

    /// Number of `confirm_payment` calls received.
    #[must_use]
    pub fn confirm_payment_calls(&self) -> usize {
        self.inner.confirm_calls.load(Ordering::SeqCst)
    }

    /// Every `create_booking` request received, in order.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn create_requests(&self) -> Vec<CreateBookingRequest> {
        self.inner.create_requests.lock().unwrap().clone()
    }

    /// Every `add_contact` request received, in order.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn contact_requests(&self) -> Vec<ContactRequest> {
        self.inner.contact_requests.lock().unwrap().clone()
    }

    /// Every `confirm_payment` request received, in order.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn confirmations(&self) -> Vec<PaymentConfirmation> {
        self.inner.confirmations.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn simulate_latency(&self) {
        let latency = *self.inner.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    fn scripted_failure(slot: &Mutex<Option<CheckoutError>>) -> Option<CheckoutError> {
        slot.lock().unwrap().clone()
    }

    /// Recompute the charge the way the real backend would: from the
    /// booking record, using the same price table, in minor currency
    /// units.
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    fn amount_for_last_booking(&self) -> u64 {
        let requests = self.inner.create_requests.lock().unwrap();
        let Some(request) = requests.last() else {
            return 0;
        };

        let duration = match request.ticket_type.as_str() {
            "season" => DurationClass::SeasonPass,
            _ => DurationClass::SingleDay,
        };
        let tier = match request.pass_type.as_str() {
            "male" => TierCode::Male,
            "couple" => TierCode::Couple,
            "kids" => TierCode::Kids,
            "family" => TierCode::Family,
            _ => TierCode::Female,
        };

        pricing::quote(duration, tier, request.num_tickets)
            .map(|quote| quote.total_amount * 100)
            .unwrap_or_default()
    }
}

impl BookingBackend for MockBookingBackend {
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<CreatedBooking> {
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_requests.lock().unwrap().push(request);
        self.simulate_latency().await;

        if let Some(error) = Self::scripted_failure(&self.inner.fail_create) {
            return Err(error);
        }

        let id = self.inner.booking_id.lock().unwrap().clone();
        tracing::info!(booking_id = %id, "Mock booking created");
        Ok(CreatedBooking {
            id: BookingId::new(id),
        })
    }

    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn add_contact(&self, request: ContactRequest) -> Result<()> {
        self.inner.contact_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.contact_requests.lock().unwrap().push(request);
        self.simulate_latency().await;

        match Self::scripted_failure(&self.inner.fail_contact) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn create_payment_order(
        &self,
        request: PaymentOrderRequest,
    ) -> Result<PaymentOrderOutcome> {
        self.inner.order_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.order_requests.lock().unwrap().push(request);
        self.simulate_latency().await;

        if let Some(error) = Self::scripted_failure(&self.inner.fail_order) {
            return Err(error);
        }

        if *self.inner.email_sent.lock().unwrap() {
            tracing::info!("Mock payment bypassed, confirmation email already sent");
            return Ok(PaymentOrderOutcome {
                order: None,
                email_sent: true,
            });
        }

        let order = PaymentOrder {
            id: format!("mock_order_{}", uuid::Uuid::new_v4()),
            amount: self.amount_for_last_booking(),
            currency: "INR".to_string(),
        };
        tracing::info!(order_id = %order.id, amount = order.amount, "Mock payment order created");
        Ok(PaymentOrderOutcome {
            order: Some(order),
            email_sent: false,
        })
    }

    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn confirm_payment(&self, confirmation: PaymentConfirmation) -> Result<()> {
        self.inner.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.confirmations.lock().unwrap().push(confirmation);
        self.simulate_latency().await;

        match Self::scripted_failure(&self.inner.fail_confirm) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn amount_mirrors_the_price_table_in_minor_units() {
        let backend = MockBookingBackend::new();
        backend
            .inner
            .create_requests
            .lock()
            .unwrap()
            .push(CreateBookingRequest {
                booking_date: "2025-09-24".to_string(),
                num_tickets: 6,
                pass_type: "female".to_string(),
                ticket_type: "single".to_string(),
            });

        assert_eq!(backend.amount_for_last_booking(), 180_000);
    }

    #[tokio::test]
    async fn clones_share_call_counts() {
        let backend = MockBookingBackend::new();
        let clone = backend.clone();

        clone
            .create_booking(CreateBookingRequest {
                booking_date: "2025-09-24".to_string(),
                num_tickets: 1,
                pass_type: "female".to_string(),
                ticket_type: "single".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(backend.create_booking_calls(), 1);
    }
}
