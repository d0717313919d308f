//! Error taxonomy for the checkout wizard.

use crate::validation::Field;
use thiserror::Error;

/// Result type alias for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Everything that can go wrong between a visitor and a confirmed booking.
///
/// Each variant maps to a distinct user experience: inline field messages,
/// a retryable banner, a verbatim backend message, or the one case where
/// money may have moved without a confirmed booking. No failure is ever
/// swallowed; every path surfaces one of these and releases the wizard's
/// submitting flag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A field failed its gate; recoverable locally, the step does not
    /// advance and the message is shown inline.
    #[error("{message}")]
    Validation {
        /// Field the message belongs to.
        field: Field,
        /// Message to show inline.
        message: String,
    },

    /// The backend could not be reached at all (network failure, no
    /// response). Retryable; the wizard stays on the current step.
    #[error("Unable to reach the booking service: {message}")]
    BackendUnavailable {
        /// Transport-level description.
        message: String,
    },

    /// The backend answered with a structured error payload, surfaced
    /// verbatim (e.g. its missing-database condition).
    #[error("{message}")]
    BackendRejected {
        /// Backend-supplied message, shown as-is.
        message: String,
        /// Machine-readable error code, when the backend sent one.
        code: Option<String>,
    },

    /// The payment widget could not be loaded; the step does not advance.
    #[error("Payment screen failed to load: {message}")]
    GatewayLoad {
        /// Loader failure description.
        message: String,
    },

    /// The gateway reported a successful charge but the backend refused to
    /// confirm it. Money may have moved; this must never be presented as a
    /// generic failure.
    #[error("Payment was captured but the booking could not be confirmed: {message}")]
    PaymentNotConfirmed {
        /// Confirmation failure description.
        message: String,
    },
}

impl CheckoutError {
    /// Returns `true` when simply trying again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. } | Self::GatewayLoad { .. })
    }

    /// Returns `true` when money may have moved without a confirmed
    /// booking. Callers should route these to support, not to a retry
    /// button.
    #[must_use]
    pub const fn is_payment_critical(&self) -> bool {
        matches!(self, Self::PaymentNotConfirmed { .. })
    }
}
