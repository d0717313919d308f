//! Mock payment gateway for testing.
//!
//! Simulates the checkout widget without loading any SDK. Compatible in
//! spirit with hosted gateways like Razorpay or Stripe Checkout; the
//! receipt is shaped like their signed results but signs nothing.

use crate::error::{CheckoutError, Result};
use crate::providers::{CheckoutSheet, GatewayReceipt, PaymentGateway};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted payment gateway (succeeds by default).
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    open_calls: AtomicUsize,
    failure: Mutex<Option<CheckoutError>>,
    sheets: Mutex<Vec<CheckoutSheet>>,
}

impl MockPaymentGateway {
    /// Create a gateway that approves every charge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `open` with the given error.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn failing(self, error: CheckoutError) -> Self {
        *self.inner.failure.lock().unwrap() = Some(error);
        self
    }

    /// Number of times the widget was opened.
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.inner.open_calls.load(Ordering::SeqCst)
    }

    /// Every checkout sheet the widget was opened with, in order.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn sheets(&self) -> Vec<CheckoutSheet> {
        self.inner.sheets.lock().unwrap().clone()
    }
}

impl PaymentGateway for MockPaymentGateway {
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    async fn open(&self, sheet: CheckoutSheet) -> Result<GatewayReceipt> {
        self.inner.open_calls.fetch_add(1, Ordering::SeqCst);
        let order_id = sheet.order_id.clone();
        self.inner.sheets.lock().unwrap().push(sheet);

        if let Some(error) = self.inner.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let receipt = GatewayReceipt {
            order_id,
            payment_id: format!("mock_pay_{}", uuid::Uuid::new_v4()),
            signature: format!("mock_sig_{}", uuid::Uuid::new_v4()),
        };
        tracing::info!(
            order_id = %receipt.order_id,
            payment_id = %receipt.payment_id,
            "Mock payment approved"
        );
        Ok(receipt)
    }
}
