//! The booking wizard reducer.
//!
//! Implements the four-step checkout state machine:
//!
//! ```text
//! Selecting(1) → Contact(2) → Review(3) → Confirmed(4)
//! ```
//!
//! Forward transitions pass a validation gate and then ride a backend
//! call; back transitions are free; only an explicit reset leaves the
//! confirmed step. All decision logic lives here; effects only describe
//! the backend and gateway calls, and their results come back as events.
//!
//! # Concurrency discipline
//!
//! At most one outbound request is in flight per session. `is_submitting`
//! is set before any effect is issued and cleared in every exit path; a
//! submit command arriving while it is set is ignored entirely (not
//! queued), so repeated clicks can never issue duplicate booking or
//! payment calls.

use crate::actions::CheckoutAction;
use crate::environment::CheckoutEnvironment;
use crate::error::CheckoutError;
use crate::pricing;
use crate::providers::{
    BookingBackend, CheckoutSheet, ContactRequest, CreateBookingRequest, PaymentConfirmation,
    PaymentGateway, PaymentOrder, PaymentOrderRequest, Prefill,
};
use crate::state::{CheckoutState, WizardStep};
use crate::validation::{self, Field};
use boxoffice_core::effect::Effect;
use boxoffice_core::environment::Clock;
use boxoffice_core::reducer::Reducer;
use boxoffice_core::{SmallVec, smallvec};

/// Reducer for the booking wizard.
#[derive(Debug, Clone)]
pub struct CheckoutReducer<B, G, C> {
    /// Phantom data to hold the environment type parameters.
    _phantom: std::marker::PhantomData<(B, G, C)>,
}

impl<B, G, C> CheckoutReducer<B, G, C> {
    /// Create a new checkout reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<B, G, C> Default for CheckoutReducer<B, G, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// No effects.
fn none<A>() -> SmallVec<[Effect<A>; 4]> {
    SmallVec::new()
}

impl<B, G, C> Reducer for CheckoutReducer<B, G, C>
where
    B: BookingBackend + Clone + 'static,
    G: PaymentGateway + Clone + 'static,
    C: Clock + Clone,
{
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment<B, G, C>;

    #[allow(clippy::too_many_lines)] // One arm per transition of the machine
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Field edits
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::SetEventDate(date) => {
                if state.step != WizardStep::Selecting {
                    tracing::warn!(step = %state.step, "Ignoring selection edit outside step 1");
                    return none();
                }
                state.selection.event_date = date;
                state.field_errors.remove(&Field::EventDate);
                none()
            }

            CheckoutAction::SetDuration(duration) => {
                if state.step != WizardStep::Selecting {
                    tracing::warn!(step = %state.step, "Ignoring selection edit outside step 1");
                    return none();
                }
                state.selection.duration = duration;
                // The tier sets differ per duration; restart from the default
                state.selection.tier = crate::types::TierCode::Female;
                state.field_errors.remove(&Field::Tier);
                none()
            }

            CheckoutAction::SetTier(tier) => {
                if state.step != WizardStep::Selecting {
                    tracing::warn!(step = %state.step, "Ignoring selection edit outside step 1");
                    return none();
                }
                state.selection.tier = tier;
                state.field_errors.remove(&Field::Tier);
                none()
            }

            CheckoutAction::SetQuantity(quantity) => {
                if state.step != WizardStep::Selecting {
                    tracing::warn!(step = %state.step, "Ignoring selection edit outside step 1");
                    return none();
                }
                state.selection.quantity = quantity;
                state.field_errors.remove(&Field::Quantity);
                none()
            }

            CheckoutAction::SetFullName(name) => {
                if state.step != WizardStep::Contact {
                    tracing::warn!(step = %state.step, "Ignoring contact edit outside step 2");
                    return none();
                }
                state.contact.full_name = name;
                state.field_errors.remove(&Field::FullName);
                none()
            }

            CheckoutAction::SetEmail(email) => {
                if state.step != WizardStep::Contact {
                    tracing::warn!(step = %state.step, "Ignoring contact edit outside step 2");
                    return none();
                }
                state.contact.email = email;
                state.field_errors.remove(&Field::Email);
                none()
            }

            CheckoutAction::SetPhone(phone) => {
                if state.step != WizardStep::Contact {
                    tracing::warn!(step = %state.step, "Ignoring contact edit outside step 2");
                    return none();
                }
                // Strip as typed; the gate re-checks length on submit
                state.contact.phone = validation::sanitize_phone(&phone);
                state.field_errors.remove(&Field::Phone);
                none()
            }

            // ═══════════════════════════════════════════════════════════
            // Selecting → Contact
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::SubmitSelection => {
                if state.step != WizardStep::Selecting {
                    tracing::warn!(step = %state.step, "SubmitSelection outside step 1");
                    return none();
                }
                if state.is_submitting {
                    tracing::warn!("SubmitSelection while a request is in flight, ignored");
                    return none();
                }

                let errors = validation::validate_selection(&state.selection);
                if !errors.is_empty() {
                    state.field_errors = errors;
                    return none();
                }

                state.field_errors.clear();
                state.last_error = None;
                state.is_submitting = true;

                let backend = env.backend.clone();
                let request = CreateBookingRequest::from(&state.selection);
                smallvec![Effect::Future(Box::pin(async move {
                    match backend.create_booking(request).await {
                        Ok(created) => Some(CheckoutAction::BookingCreated {
                            booking_id: created.id,
                        }),
                        Err(error) => Some(CheckoutAction::BookingFailed { error }),
                    }
                }))]
            }

            CheckoutAction::BookingCreated { booking_id } => {
                if state.step != WizardStep::Selecting || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale BookingCreated event, ignored");
                    return none();
                }
                tracing::info!(%booking_id, "Booking created, advancing to contact step");
                state.booking_id = Some(booking_id);
                state.is_submitting = false;
                state.step = WizardStep::Contact;
                none()
            }

            CheckoutAction::BookingFailed { error } => {
                if state.step != WizardStep::Selecting || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale BookingFailed event, ignored");
                    return none();
                }
                tracing::warn!(%error, "Booking creation failed");
                state.is_submitting = false;
                state.last_error = Some(error);
                none()
            }

            // ═══════════════════════════════════════════════════════════
            // Contact → Review
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::SubmitContact => {
                if state.step != WizardStep::Contact {
                    tracing::warn!(step = %state.step, "SubmitContact outside step 2");
                    return none();
                }
                if state.is_submitting {
                    tracing::warn!("SubmitContact while a request is in flight, ignored");
                    return none();
                }
                // Fail closed: without a booking reference there is nothing
                // to attach the contact to, so no request is issued.
                let Some(booking_id) = state.booking_id.clone() else {
                    tracing::warn!("SubmitContact without a booking reference, ignored");
                    return none();
                };

                let errors =
                    validation::validate_contact(&state.contact, &env.config.approved_email_domain);
                if !errors.is_empty() {
                    state.field_errors = errors;
                    return none();
                }

                state.field_errors.clear();
                state.last_error = None;
                state.is_submitting = true;

                let backend = env.backend.clone();
                let request = ContactRequest::new(booking_id, &state.contact);
                smallvec![Effect::Future(Box::pin(async move {
                    match backend.add_contact(request).await {
                        Ok(()) => Some(CheckoutAction::ContactSaved),
                        Err(error) => Some(CheckoutAction::ContactRejected { error }),
                    }
                }))]
            }

            CheckoutAction::ContactSaved => {
                if state.step != WizardStep::Contact || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale ContactSaved event, ignored");
                    return none();
                }
                state.is_submitting = false;
                state.step = WizardStep::Review;
                none()
            }

            CheckoutAction::ContactRejected { error } => {
                if state.step != WizardStep::Contact || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale ContactRejected event, ignored");
                    return none();
                }
                tracing::warn!(%error, "Contact details rejected");
                state.is_submitting = false;
                state.last_error = Some(error);
                none()
            }

            // ═══════════════════════════════════════════════════════════
            // Review → Confirmed (payment leg)
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::StartPayment => {
                if state.step != WizardStep::Review {
                    tracing::warn!(step = %state.step, "StartPayment outside step 3");
                    return none();
                }
                if state.is_submitting {
                    tracing::warn!("StartPayment while a request is in flight, ignored");
                    return none();
                }
                let Some(booking_id) = state.booking_id.clone() else {
                    tracing::warn!("StartPayment without a booking reference, ignored");
                    return none();
                };

                state.last_error = None;
                state.is_submitting = true;

                let backend = env.backend.clone();
                let request = PaymentOrderRequest {
                    booking_id,
                    user_email: state.contact.email.clone(),
                    user_name: state.contact.full_name.clone(),
                };
                smallvec![Effect::Future(Box::pin(async move {
                    match backend.create_payment_order(request).await {
                        Ok(outcome) if outcome.email_sent => {
                            Some(CheckoutAction::ConfirmationBypassed)
                        }
                        Ok(outcome) => match outcome.order {
                            Some(order) => Some(CheckoutAction::PaymentOrderReady { order }),
                            None => Some(CheckoutAction::PaymentOrderFailed {
                                error: CheckoutError::BackendRejected {
                                    message: "Payment order missing from response".to_string(),
                                    code: None,
                                },
                            }),
                        },
                        Err(error) => Some(CheckoutAction::PaymentOrderFailed { error }),
                    }
                }))]
            }

            CheckoutAction::ConfirmationBypassed => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale ConfirmationBypassed event, ignored");
                    return none();
                }
                // The backend already dispatched the email; no widget, no
                // confirmation round-trip.
                tracing::info!("Confirmation email already sent, skipping payment widget");
                state.is_submitting = false;
                state.step = WizardStep::Confirmed;
                state.confirmed_at = Some(env.clock.now());
                none()
            }

            CheckoutAction::PaymentOrderReady { order } => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale PaymentOrderReady event, ignored");
                    return none();
                }
                // Still submitting: the widget hand-off continues the same
                // transition.
                let sheet = build_sheet(state, env, &order);
                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.open(sheet).await {
                        Ok(receipt) => Some(CheckoutAction::GatewayApproved { receipt }),
                        Err(error) => Some(CheckoutAction::GatewayFailed { error }),
                    }
                }))]
            }

            CheckoutAction::PaymentOrderFailed { error } => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale PaymentOrderFailed event, ignored");
                    return none();
                }
                tracing::warn!(%error, "Payment order creation failed");
                state.is_submitting = false;
                state.last_error = Some(error);
                none()
            }

            CheckoutAction::GatewayApproved { receipt } => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale GatewayApproved event, ignored");
                    return none();
                }
                let Some(booking_id) = state.booking_id.clone() else {
                    // The gateway has captured money we can no longer tie to
                    // a booking; this must surface as payment-critical.
                    tracing::error!("Gateway approval without a booking reference");
                    state.is_submitting = false;
                    state.last_error = Some(CheckoutError::PaymentNotConfirmed {
                        message: "session lost its booking reference".to_string(),
                    });
                    return none();
                };

                let backend = env.backend.clone();
                let confirmation = PaymentConfirmation {
                    booking_id,
                    gateway_order_id: receipt.order_id,
                    gateway_payment_id: receipt.payment_id,
                    gateway_signature: receipt.signature,
                };
                smallvec![Effect::Future(Box::pin(async move {
                    match backend.confirm_payment(confirmation).await {
                        Ok(()) => Some(CheckoutAction::PaymentConfirmed),
                        // Gateway success followed by a failed confirmation
                        // is its own error class: money may have moved.
                        Err(error) => Some(CheckoutAction::ConfirmationFailed {
                            error: CheckoutError::PaymentNotConfirmed {
                                message: error.to_string(),
                            },
                        }),
                    }
                }))]
            }

            CheckoutAction::GatewayFailed { error } => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale GatewayFailed event, ignored");
                    return none();
                }
                tracing::warn!(%error, "Payment widget failed");
                state.is_submitting = false;
                state.last_error = Some(error);
                none()
            }

            CheckoutAction::PaymentConfirmed => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale PaymentConfirmed event, ignored");
                    return none();
                }
                tracing::info!("Payment confirmed, booking complete");
                state.is_submitting = false;
                state.step = WizardStep::Confirmed;
                state.confirmed_at = Some(env.clock.now());
                none()
            }

            CheckoutAction::ConfirmationFailed { error } => {
                if state.step != WizardStep::Review || !state.is_submitting {
                    tracing::warn!(step = %state.step, "Stale ConfirmationFailed event, ignored");
                    return none();
                }
                tracing::error!(%error, "Payment captured but confirmation failed");
                state.is_submitting = false;
                state.last_error = Some(error);
                none()
            }

            // ═══════════════════════════════════════════════════════════
            // Navigation
            // ═══════════════════════════════════════════════════════════
            CheckoutAction::GoBack => {
                if state.is_submitting {
                    tracing::warn!("GoBack while a request is in flight, ignored");
                    return none();
                }
                match state.step.previous() {
                    Some(previous) => {
                        state.step = previous;
                        state.field_errors.clear();
                        state.last_error = None;
                    }
                    None => {
                        tracing::warn!(step = %state.step, "No previous step to go back to");
                    }
                }
                none()
            }

            CheckoutAction::Reset => {
                *state = CheckoutState::default();
                none()
            }
        }
    }
}

/// Assemble the widget configuration from the backend order, deployment
/// configuration and collected contact details.
fn build_sheet<B, G, C>(
    state: &CheckoutState,
    env: &CheckoutEnvironment<B, G, C>,
    order: &PaymentOrder,
) -> CheckoutSheet
where
    B: BookingBackend + Clone,
    G: PaymentGateway + Clone,
    C: Clock + Clone,
{
    let label = pricing::display_label(state.selection.duration, state.selection.tier)
        .unwrap_or_else(|| state.selection.tier.to_string());

    CheckoutSheet {
        key_id: env.config.gateway_key_id.clone(),
        order_id: order.id.clone(),
        amount: order.amount,
        currency: order.currency.clone(),
        event_label: env.config.event_label.clone(),
        description: format!("Booking for {} {label}", state.selection.quantity),
        prefill: Prefill {
            name: state.contact.full_name.clone(),
            email: state.contact.email.clone(),
            contact: state.contact.phone.clone(),
        },
    }
}
