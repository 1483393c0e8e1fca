//! EntitlementGate - Wires the access services together.
//!
//! The gate owns the shared access state, the paywall orchestrator, the
//! fallback gate and the foreground refresher, and runs the two background
//! loops (paywall callbacks, fallback observation) until `shutdown`.
//! Host applications forward their lifecycle events here and ask `screen`
//! what to show.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::access_state_machine::AccessStateMachine;
use super::fallback_gate_controller::FallbackGateController;
use super::foreground_refresher::{ForegroundRefresher, RefreshDecision};
use super::paywall_orchestrator::PaywallOrchestrator;
use super::present_outcome::PresentOutcome;
use super::reconciler::Reconciler;
use crate::adapters::paywall::ChannelPaywallHandler;
use crate::config::GateConfig;
use crate::domain::access::{render, PurchaseSignal, Screen};
use crate::ports::{Clock, EntitlementStore, NetworkStatus, PaywallService};

/// External collaborators the gate runs against.
#[derive(Clone)]
pub struct GateDependencies {
    pub store: Arc<dyn EntitlementStore>,
    pub paywall: Arc<dyn PaywallService>,
    pub network: Arc<dyn NetworkStatus>,
    pub clock: Arc<dyn Clock>,
    /// Set by the host's purchase delegate.
    pub purchases: Arc<PurchaseSignal>,
}

pub struct EntitlementGate {
    access: Arc<AccessStateMachine>,
    orchestrator: Arc<PaywallOrchestrator>,
    fallback: Arc<FallbackGateController>,
    foreground: ForegroundRefresher,
    purchases: Arc<PurchaseSignal>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl EntitlementGate {
    /// Builds the services and spawns their loops on the current runtime.
    pub fn start(deps: GateDependencies, config: &GateConfig) -> Self {
        let access = Arc::new(AccessStateMachine::new(deps.store));
        let (handler, events) = ChannelPaywallHandler::channel();

        let fallback = Arc::new(FallbackGateController::new(
            access.clone(),
            deps.network,
            deps.paywall.clone(),
            deps.clock.clone(),
            handler.clone(),
            config.paywall.placement.clone(),
            config.fallback.auto_retry_interval(),
        ));

        let reconciler = Reconciler::new(
            access.clone(),
            deps.purchases.clone(),
            deps.clock.clone(),
            config.reconciliation.schedule(),
        );
        let orchestrator = Arc::new(PaywallOrchestrator::new(
            access.clone(),
            reconciler,
            deps.paywall,
            fallback.clone(),
            deps.clock.clone(),
            handler,
            config.paywall.clone(),
        ));

        let foreground = ForegroundRefresher::new(
            access.clone(),
            deps.clock,
            config.foreground.refresh_interval(),
        );

        let (shutdown, shutdown_rx) = watch::channel(false);
        let tasks = vec![
            tokio::spawn({
                let orchestrator = orchestrator.clone();
                let shutdown_rx = shutdown_rx.clone();
                async move { orchestrator.run(events, shutdown_rx).await }
            }),
            tokio::spawn({
                let fallback = fallback.clone();
                async move { fallback.run(shutdown_rx).await }
            }),
        ];

        tracing::info!(placement = %config.paywall.placement, "Entitlement gate started");

        Self {
            access,
            orchestrator,
            fallback,
            foreground,
            purchases: deps.purchases,
            shutdown,
            tasks,
        }
    }

    pub fn access(&self) -> &Arc<AccessStateMachine> {
        &self.access
    }

    pub fn orchestrator(&self) -> &Arc<PaywallOrchestrator> {
        &self.orchestrator
    }

    pub fn fallback(&self) -> &Arc<FallbackGateController> {
        &self.fallback
    }

    /// Screen the host should show right now.
    pub fn screen(&self, is_onboarding: bool) -> Screen {
        render(
            self.access.current(),
            is_onboarding,
            self.orchestrator.is_presentation_resolved(),
        )
    }

    /// Forwarded from the host's purchase delegate.
    pub fn record_purchase(&self) {
        self.purchases.record_purchase();
    }

    pub async fn on_onboarding_complete(&self) -> PresentOutcome {
        self.orchestrator.on_onboarding_complete().await
    }

    /// Unthrottled refresh, typically at launch.
    pub async fn refresh_now(&self) -> RefreshDecision {
        self.foreground.refresh_now().await
    }

    /// App returned to the foreground.
    ///
    /// Refreshes entitlement (throttled), then lets the fallback gate make
    /// its own automatic attempt if it is up.
    pub async fn on_became_active(&self) -> RefreshDecision {
        let decision = self.foreground.on_became_active().await;
        if let Some(outcome) = self.fallback.on_became_active().await {
            tracing::debug!(?outcome, "Fallback gate foreground attempt");
        }
        decision
    }

    /// Stops the background loops, cancelling any reconciliation in flight.
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Gate task ended abnormally");
            }
        }
        tracing::info!("Entitlement gate stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEntitlementStore, MockPaywallService, TokioClock, WatchNetworkStatus};
    use crate::domain::access::AccessState;

    fn deps(store: Arc<InMemoryEntitlementStore>) -> GateDependencies {
        GateDependencies {
            store,
            paywall: Arc::new(MockPaywallService::new()),
            network: Arc::new(WatchNetworkStatus::new(true)),
            clock: Arc::new(TokioClock::new()),
            purchases: Arc::new(PurchaseSignal::new()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starts_loading_until_first_refresh() {
        let store = Arc::new(InMemoryEntitlementStore::entitled());
        let gate = EntitlementGate::start(deps(store), &GateConfig::default());

        assert_eq!(gate.screen(false), Screen::Loading);
        assert_eq!(gate.screen(true), Screen::Onboarding);

        gate.refresh_now().await;

        assert_eq!(gate.access().current(), AccessState::Subscribed);
        assert_eq!(gate.screen(false), Screen::Content);
        gate.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn subscribed_user_skips_onboarding_paywall() {
        let store = Arc::new(InMemoryEntitlementStore::entitled());
        let gate = EntitlementGate::start(deps(store), &GateConfig::default());
        gate.refresh_now().await;

        let outcome = gate.on_onboarding_complete().await;

        assert_eq!(outcome, PresentOutcome::AlreadySubscribed);
        assert!(gate.orchestrator().is_presentation_resolved());
        gate.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_background_loops() {
        let gate = EntitlementGate::start(
            deps(Arc::new(InMemoryEntitlementStore::new())),
            &GateConfig::default(),
        );

        tokio::time::timeout(std::time::Duration::from_secs(1), gate.shutdown())
            .await
            .expect("shutdown should complete");
    }
}
