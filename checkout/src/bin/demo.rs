//! Checkout demo binary
//!
//! Walks one booking through all four wizard steps against the mock
//! backend and gateway, printing the state after each transition.

use boxoffice_checkout::mocks::{MockBookingBackend, MockPaymentGateway};
use boxoffice_checkout::{
    CheckoutAction, CheckoutConfig, CheckoutEnvironment, CheckoutReducer, CheckoutState,
};
use boxoffice_core::environment::SystemClock;
use boxoffice_runtime::Store;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,boxoffice_checkout=debug,boxoffice_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Boxoffice Checkout: wizard walkthrough ===\n");

    // Configuration is built once and handed to the environment; in a real
    // deployment the values come from the process environment at startup.
    let config = CheckoutConfig::new(
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string()),
        std::env::var("GATEWAY_KEY_ID").unwrap_or_default(),
    );

    let backend = MockBookingBackend::new();
    let gateway = MockPaymentGateway::new();
    let env = CheckoutEnvironment::new(backend, gateway, SystemClock, config);

    let store = Store::new(CheckoutState::default(), CheckoutReducer::new(), env);

    // Step 1: ticket selection
    store
        .send(CheckoutAction::SetEventDate("2025-09-24".to_string()))
        .await?;
    store.send(CheckoutAction::SetQuantity(6)).await?;

    let quote = store.state(CheckoutState::quote).await?;
    println!(
        "Step 1: 6 tickets at ₹{} each, total ₹{} (saved ₹{})",
        quote.unit_price, quote.total_amount, quote.savings
    );

    let created = store
        .send_and_wait_for(
            CheckoutAction::SubmitSelection,
            |a| {
                matches!(
                    a,
                    CheckoutAction::BookingCreated { .. } | CheckoutAction::BookingFailed { .. }
                )
            },
            WAIT,
        )
        .await?;
    println!("Step 1 result: {created:?}");

    // Step 2: contact details
    store
        .send(CheckoutAction::SetFullName("Asha".to_string()))
        .await?;
    store
        .send(CheckoutAction::SetEmail("asha@gmail.com".to_string()))
        .await?;
    store
        .send(CheckoutAction::SetPhone("9876543210".to_string()))
        .await?;

    let saved = store
        .send_and_wait_for(
            CheckoutAction::SubmitContact,
            |a| {
                matches!(
                    a,
                    CheckoutAction::ContactSaved | CheckoutAction::ContactRejected { .. }
                )
            },
            WAIT,
        )
        .await?;
    println!("Step 2 result: {saved:?}");

    // Step 3: review and pay
    let step = store.state(|s| s.step).await;
    println!("Step 3: reviewing order at step {step} (total ₹{})", quote.total_amount);

    let outcome = store
        .send_and_wait_for(
            CheckoutAction::StartPayment,
            |a| {
                matches!(
                    a,
                    CheckoutAction::PaymentConfirmed
                        | CheckoutAction::ConfirmationBypassed
                        | CheckoutAction::PaymentOrderFailed { .. }
                        | CheckoutAction::GatewayFailed { .. }
                        | CheckoutAction::ConfirmationFailed { .. }
                )
            },
            WAIT,
        )
        .await?;
    println!("Step 3 result: {outcome:?}");

    // Step 4: confirmation
    let (step, confirmed_at) = store.state(|s| (s.step, s.confirmed_at)).await;
    println!("\nFinal step: {step} (confirmed at {confirmed_at:?})");

    store.shutdown(WAIT).await?;
    Ok(())
}
