//! Checkout environment.
//!
//! This module defines the environment type for dependency injection in
//! the wizard reducer.

use crate::config::CheckoutConfig;
use crate::providers::{BookingBackend, PaymentGateway};
use boxoffice_core::environment::Clock;

/// Checkout environment.
///
/// Contains every external dependency the wizard reducer needs, plus the
/// immutable deployment configuration. Built once at startup; the reducer
/// never reaches for ambient state.
///
/// # Type Parameters
///
/// - `B`: Booking backend client
/// - `G`: Payment gateway
/// - `C`: Clock
#[derive(Clone)]
pub struct CheckoutEnvironment<B, G, C>
where
    B: BookingBackend + Clone,
    G: PaymentGateway + Clone,
    C: Clock + Clone,
{
    /// Booking backend client.
    pub backend: B,

    /// Payment gateway bridge.
    pub gateway: G,

    /// Clock for confirmation timestamps.
    pub clock: C,

    /// Deployment configuration.
    pub config: CheckoutConfig,
}

impl<B, G, C> CheckoutEnvironment<B, G, C>
where
    B: BookingBackend + Clone,
    G: PaymentGateway + Clone,
    C: Clock + Clone,
{
    /// Create a new checkout environment.
    #[must_use]
    pub const fn new(backend: B, gateway: G, clock: C, config: CheckoutConfig) -> Self {
        Self {
            backend,
            gateway,
            clock,
            config,
        }
    }
}
