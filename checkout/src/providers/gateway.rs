//! Payment gateway bridge.
//!
//! The gateway ships as an externally hosted checkout SDK. The bridge owns
//! the two awkward parts of talking to it and nothing else:
//!
//! 1. loading the SDK exactly once per session, with concurrent callers
//!    awaiting the same load, and
//! 2. adapting its completion callback into an async result.
//!
//! The bridge performs no verification; the signed receipt goes to the
//! backend untouched.

use crate::error::{CheckoutError, Result};
use crate::providers::{CheckoutSheet, GatewayReceipt, PaymentGateway};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A loaded gateway SDK handle.
///
/// Object-safe so the bridge can cache one handle behind `Arc<dyn _>`,
/// hence the boxed future.
pub trait GatewaySdk: Send + Sync {
    /// Present the checkout widget and resolve with the signed result of a
    /// successful charge.
    fn open_checkout(
        &self,
        sheet: CheckoutSheet,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayReceipt>> + Send>>;
}

/// Fetches and evaluates the gateway SDK.
///
/// # Errors
///
/// `load` fails with [`CheckoutError::GatewayLoad`] when the SDK cannot be
/// fetched.
pub trait SdkLoader: Send + Sync {
    /// Load the SDK, yielding a reusable handle.
    fn load(&self) -> impl Future<Output = Result<Arc<dyn GatewaySdk>>> + Send;
}

/// Bridge between the wizard and the gateway's checkout SDK.
///
/// Clones share the loaded SDK handle, so a session loads the SDK at most
/// once no matter how many payment attempts it makes. A failed load is not
/// cached; the next open retries it.
#[derive(Clone)]
pub struct GatewayBridge<L> {
    loader: L,
    sdk: Arc<OnceCell<Arc<dyn GatewaySdk>>>,
}

impl<L> GatewayBridge<L>
where
    L: SdkLoader,
{
    /// Create a bridge that loads the SDK through `loader` on first use.
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sdk: Arc::new(OnceCell::new()),
        }
    }

    /// Whether the SDK has already been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.sdk.initialized()
    }

    async fn sdk(&self) -> Result<&Arc<dyn GatewaySdk>> {
        self.sdk
            .get_or_try_init(|| async {
                tracing::debug!("Loading payment gateway SDK");
                self.loader.load().await
            })
            .await
    }
}

impl<L> PaymentGateway for GatewayBridge<L>
where
    L: SdkLoader,
{
    async fn open(&self, sheet: CheckoutSheet) -> Result<GatewayReceipt> {
        let sdk = self.sdk().await?;
        tracing::debug!(order_id = %sheet.order_id, "Opening payment widget");
        sdk.open_checkout(sheet).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::providers::Prefill;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSdk;

    impl GatewaySdk for StaticSdk {
        fn open_checkout(
            &self,
            sheet: CheckoutSheet,
        ) -> Pin<Box<dyn Future<Output = Result<GatewayReceipt>> + Send>> {
            Box::pin(async move {
                Ok(GatewayReceipt {
                    order_id: sheet.order_id,
                    payment_id: "pay_1".to_string(),
                    signature: "sig_1".to_string(),
                })
            })
        }
    }

    #[derive(Clone)]
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
        fail_first: Arc<AtomicUsize>,
    }

    impl CountingLoader {
        fn new(failures_before_success: usize) -> Self {
            Self {
                loads: Arc::new(AtomicUsize::new(0)),
                fail_first: Arc::new(AtomicUsize::new(failures_before_success)),
            }
        }
    }

    impl SdkLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn GatewaySdk>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(CheckoutError::GatewayLoad {
                    message: "script unreachable".to_string(),
                });
            }
            Ok(Arc::new(StaticSdk))
        }
    }

    fn sheet() -> CheckoutSheet {
        CheckoutSheet {
            key_id: "key_test".to_string(),
            order_id: "order_1".to_string(),
            amount: 1800,
            currency: "INR".to_string(),
            event_label: "Test Event".to_string(),
            description: "Booking for 6 tickets".to_string(),
            prefill: Prefill::default(),
        }
    }

    #[tokio::test]
    async fn sdk_loads_once_across_repeated_opens() {
        let loader = CountingLoader::new(0);
        let loads = Arc::clone(&loader.loads);
        let bridge = GatewayBridge::new(loader);

        assert!(!bridge.is_loaded());
        bridge.open(sheet()).await.unwrap();
        bridge.open(sheet()).await.unwrap();

        assert!(bridge.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_opens_share_one_load() {
        let loader = CountingLoader::new(0);
        let loads = Arc::clone(&loader.loads);
        let bridge = GatewayBridge::new(loader);

        let (first, second) =
            tokio::join!(bridge.open(sheet()), bridge.open(sheet()));
        first.unwrap();
        second.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clones_share_the_loaded_sdk() {
        let loader = CountingLoader::new(0);
        let loads = Arc::clone(&loader.loads);
        let bridge = GatewayBridge::new(loader);
        let clone = bridge.clone();

        bridge.open(sheet()).await.unwrap();
        clone.open(sheet()).await.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_surfaced_and_retried() {
        let loader = CountingLoader::new(1);
        let loads = Arc::clone(&loader.loads);
        let bridge = GatewayBridge::new(loader);

        let failure = bridge.open(sheet()).await;
        assert!(matches!(failure, Err(CheckoutError::GatewayLoad { .. })));
        assert!(!bridge.is_loaded());

        // The failure was not cached; the next open loads again.
        bridge.open(sheet()).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
