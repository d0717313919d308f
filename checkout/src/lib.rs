//! # Boxoffice Checkout
//!
//! The booking wizard for a single live event: a visitor picks a ticket
//! tier and quantity, supplies contact details, and pays through a
//! third-party gateway. The wizard owns the ordered steps, the pricing
//! rules, the validation gates, and the coordination protocol between the
//! client, the booking backend and the payment widget. Nothing else.
//!
//! ## Architecture
//!
//! The wizard is implemented as a reducer over one explicit session value:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! The backend and the gateway are reached only through the provider
//! traits in [`providers`]; the reducer itself is a pure function and
//! tests at memory speed.
//!
//! ## Example: driving the first step
//!
//! ```rust,ignore
//! use boxoffice_checkout::*;
//! use boxoffice_runtime::Store;
//!
//! let store = Store::new(CheckoutState::default(), CheckoutReducer::new(), env);
//!
//! store.send(CheckoutAction::SetEventDate("2025-09-24".into())).await?;
//! store.send(CheckoutAction::SetQuantity(6)).await?;
//!
//! let result = store.send_and_wait_for(
//!     CheckoutAction::SubmitSelection,
//!     |a| matches!(a,
//!         CheckoutAction::BookingCreated { .. } | CheckoutAction::BookingFailed { .. }),
//!     std::time::Duration::from_secs(10),
//! ).await?;
//! ```

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod pricing;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::CheckoutAction;
pub use config::CheckoutConfig;
pub use environment::CheckoutEnvironment;
pub use error::{CheckoutError, Result};
pub use reducer::CheckoutReducer;
pub use state::{CheckoutState, WizardStep};
pub use types::{
    BookingId, ContactInfo, DurationClass, PriceQuote, TicketSelection, TierCode,
};
