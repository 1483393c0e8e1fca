//! # entitlement-gate: Demo Entry Point
//!
//! Runs one onboarding purchase against the in-memory adapters: the paywall
//! is dismissed first and the purchase delegate fires 450ms later, which the
//! reconciliation poll picks up. Prints the screen before and after.

use std::sync::Arc;
use std::time::Duration;

use entitlement_gate::adapters::{
    InMemoryEntitlementStore, MockPaywallService, PaywallStep, TokioClock, WatchNetworkStatus,
};
use entitlement_gate::application::{EntitlementGate, GateDependencies};
use entitlement_gate::config::GateConfig;
use entitlement_gate::domain::access::{PaywallResult, PurchaseSignal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GateConfig::load_validated()?;

    let filter = config.logging.env_filter()?;
    if config.logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let purchases = Arc::new(PurchaseSignal::new());
    let store = Arc::new(InMemoryEntitlementStore::new());
    let paywall = Arc::new(MockPaywallService::new().with_purchase_signal(purchases.clone()));
    paywall.push_script(vec![
        PaywallStep::Present,
        PaywallStep::Wait(Duration::from_millis(200)),
        PaywallStep::Dismiss(PaywallResult::Purchased),
        PaywallStep::Wait(Duration::from_millis(450)),
        PaywallStep::Purchase,
    ]);

    let gate = EntitlementGate::start(
        GateDependencies {
            store: store.clone(),
            paywall,
            network: Arc::new(WatchNetworkStatus::new(true)),
            clock: Arc::new(TokioClock::new()),
            purchases,
        },
        &config,
    );

    gate.refresh_now().await;
    println!("Screen at launch: {:?}", gate.screen(true));

    let outcome = gate.on_onboarding_complete().await;
    tracing::info!(?outcome, "Onboarding paywall requested");

    let mut resolved = gate.orchestrator().subscribe_resolved();
    let wait = config.reconciliation.schedule().total_wait() + Duration::from_secs(1);
    match tokio::time::timeout(wait, resolved.wait_for(|resolved| *resolved)).await {
        Ok(Ok(_)) => {
            // The store learns about the purchase once the backend syncs it.
            store.set_entitled(true);
        }
        Ok(Err(_)) | Err(_) => {
            tracing::warn!("Purchase not confirmed within the reconciliation window");
        }
    }

    println!("Access state: {:?}", gate.access().current());
    println!("Screen after onboarding: {:?}", gate.screen(false));
    println!("Fallback gate active: {}", gate.fallback().is_active());

    gate.shutdown().await;
    Ok(())
}
