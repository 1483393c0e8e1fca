//! PaywallOrchestrator - Presents the onboarding paywall and resolves its outcome.
//!
//! The orchestrator presents the paywall at most once per onboarding
//! completion, then handles the paywall callbacks on a single task:
//!
//! | Callback | Handling |
//! |----------|----------|
//! | present | Logged only |
//! | dismiss | Reconciliation (bounded poll) |
//! | error | Fixed delay, re-check, fallback gate if still not subscribed |
//! | skip | Resolve if subscribed, fallback gate otherwise |
//!
//! Callbacks from every presentation (including the fallback gate's) reach
//! `run` through the same channel, so they are handled one at a time in
//! arrival order.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};

use super::access_state_machine::AccessStateMachine;
use super::present_outcome::PresentOutcome;
use super::reconciler::Reconciler;
use super::shutdown;
use crate::adapters::paywall::ChannelPaywallHandler;
use crate::config::PaywallConfig;
use crate::domain::access::{
    AttemptDecision, FailureReason, GateError, PaywallEvent, PresentationAttempt,
    PresentationLatch, ResolutionOutcome,
};
use crate::ports::{Clock, FallbackGate, FallbackReason, PaywallHandler, PaywallService};

pub struct PaywallOrchestrator {
    access: Arc<AccessStateMachine>,
    reconciler: Reconciler,
    paywall: Arc<dyn PaywallService>,
    fallback: Arc<dyn FallbackGate>,
    clock: Arc<dyn Clock>,
    handler: ChannelPaywallHandler,
    config: PaywallConfig,
    latch: PresentationLatch,
    throttle: Mutex<PresentationAttempt>,
    resolved: watch::Sender<bool>,
}

impl PaywallOrchestrator {
    /// Creates an orchestrator.
    ///
    /// `handler` must feed the receiver later passed to `run`.
    pub fn new(
        access: Arc<AccessStateMachine>,
        reconciler: Reconciler,
        paywall: Arc<dyn PaywallService>,
        fallback: Arc<dyn FallbackGate>,
        clock: Arc<dyn Clock>,
        handler: ChannelPaywallHandler,
        config: PaywallConfig,
    ) -> Self {
        let throttle = Mutex::new(PresentationAttempt::new(config.retry_interval()));
        let (resolved, _rx) = watch::channel(false);
        Self {
            access,
            reconciler,
            paywall,
            fallback,
            clock,
            handler,
            config,
            latch: PresentationLatch::new(),
            throttle,
            resolved,
        }
    }

    /// True once access was resolved in the user's favour, until it expires.
    pub fn is_presentation_resolved(&self) -> bool {
        *self.resolved.borrow()
    }

    pub fn subscribe_resolved(&self) -> watch::Receiver<bool> {
        self.resolved.subscribe()
    }

    pub fn has_attempted(&self) -> bool {
        self.latch.is_set()
    }

    /// Entry point when onboarding finishes.
    ///
    /// Safe to call from several observers; only the first call presents.
    pub async fn on_onboarding_complete(&self) -> PresentOutcome {
        if !self.latch.try_acquire() {
            tracing::debug!("Onboarding paywall already attempted, ignoring");
            return PresentOutcome::AlreadyAttempted;
        }

        if self.access.current().is_subscribed() {
            tracing::info!("Already subscribed at onboarding completion, skipping paywall");
            self.mark_resolved();
            return PresentOutcome::AlreadySubscribed;
        }

        self.present(true).await
    }

    /// Presents the paywall again on user request, outside the onboarding latch.
    pub async fn retry_paywall(&self, force: bool) -> PresentOutcome {
        if self.access.current().is_subscribed() {
            return PresentOutcome::AlreadySubscribed;
        }
        self.present(force).await
    }

    /// Handles paywall callbacks until shutdown or until every handler is gone.
    pub async fn run(
        &self,
        mut events: mpsc::UnboundedReceiver<PaywallEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let cancel = shutdown.clone();
        let mut expirations = self.access.subscribe_expirations();
        expirations.borrow_and_update();
        loop {
            // Expiry goes first so it is handled before any callback that
            // arrived alongside it.
            tokio::select! {
                biased;
                _ = shutdown::requested(&mut shutdown) => {
                    tracing::debug!("Paywall orchestrator shutting down");
                    return;
                }
                changed = expirations.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    expirations.borrow_and_update();
                    self.on_subscription_expired().await;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event, cancel.clone()).await;
                    }
                    None => return,
                },
            }
        }
    }

    /// Handles one callback, applying and returning the resolution if it produced one.
    pub async fn handle_event(
        &self,
        event: PaywallEvent,
        cancel: watch::Receiver<bool>,
    ) -> Option<ResolutionOutcome> {
        tracing::debug!(kind = event.kind(), "Paywall event received");
        let outcome = match event {
            PaywallEvent::Presented(info) => {
                tracing::info!(placement = %info.placement, paywall_id = ?info.paywall_id, "Paywall presented");
                return None;
            }
            PaywallEvent::Dismissed { info, result } => {
                tracing::info!(placement = %info.placement, ?result, "Paywall dismissed, reconciling");
                self.reconciler.reconcile(cancel).await.outcome
            }
            PaywallEvent::Errored(message) => self.resolve_after_error(message, cancel).await,
            PaywallEvent::Skipped(reason) => {
                tracing::warn!(%reason, "Paywall skipped");
                if self.access.current().is_subscribed() {
                    ResolutionOutcome::ResolvedSubscribed
                } else {
                    ResolutionOutcome::failed(GateError::PaywallSkipped(reason))
                }
            }
        };

        self.apply(&outcome).await;
        Some(outcome)
    }

    /// A refresh found the subscription gone.
    ///
    /// Withdraws the resolved presentation, discards any purchase signal
    /// that belonged to the old subscription and brings up the fallback
    /// gate. Does nothing if access was regained in the meantime.
    pub async fn on_subscription_expired(&self) {
        if self.access.current().is_subscribed() {
            tracing::debug!("Subscription regained before expiry was handled");
            return;
        }

        self.resolved
            .send_if_modified(|resolved| std::mem::replace(resolved, false));
        if self.reconciler.discard_pending_purchase() {
            tracing::debug!("Discarded purchase signal from the expired subscription");
        }
        tracing::info!("Subscription expired, activating fallback gate");
        self.fallback.activate(FallbackReason::NotConfirmed).await;
    }

    async fn resolve_after_error(
        &self,
        message: String,
        mut cancel: watch::Receiver<bool>,
    ) -> ResolutionOutcome {
        let delay = self.config.error_retry_delay();
        tracing::warn!(error = %message, delay_ms = delay.as_millis() as u64, "Paywall failed, re-checking access after delay");

        tokio::select! {
            _ = self.clock.sleep(delay) => {}
            _ = shutdown::requested(&mut cancel) => {
                return ResolutionOutcome::Failed(FailureReason::Cancelled);
            }
        }

        if self.access.current().is_subscribed() {
            ResolutionOutcome::ResolvedSubscribed
        } else {
            ResolutionOutcome::failed(GateError::PaywallPresentationFailed(message))
        }
    }

    async fn apply(&self, outcome: &ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::ResolvedSubscribed => {
                self.access.set_subscribed();
                self.mark_resolved();
            }
            ResolutionOutcome::ResolvedNotSubscribed => {
                self.access.set_not_subscribed();
                self.fallback.activate(FallbackReason::NotConfirmed).await;
            }
            ResolutionOutcome::Failed(FailureReason::Error(error)) => {
                self.fallback.activate(fallback_reason(error)).await;
            }
            ResolutionOutcome::Failed(FailureReason::Cancelled) => {
                tracing::debug!("Resolution cancelled, access state left unchanged");
            }
        }
    }

    async fn present(&self, force: bool) -> PresentOutcome {
        let decision = self
            .throttle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .try_begin(self.clock.now(), force);
        if let AttemptDecision::Suppressed { retry_in } = decision {
            tracing::debug!(retry_in_ms = retry_in.as_millis() as u64, "Paywall presentation throttled");
            return PresentOutcome::Throttled { retry_in };
        }

        let placement = self.config.placement.as_str();
        tracing::info!(placement, force, "Presenting paywall");
        let handler: Arc<dyn PaywallHandler> = Arc::new(self.handler.clone());
        match self.paywall.present(placement, handler).await {
            Ok(()) => PresentOutcome::Presented,
            Err(e) => {
                // Route through the error callback so it gets the same delay and fallback.
                self.handler.on_error(e.to_string()).await;
                PresentOutcome::Failed(e.to_string())
            }
        }
    }

    fn mark_resolved(&self) {
        self.resolved.send_if_modified(|resolved| !std::mem::replace(resolved, true));
    }
}

fn fallback_reason(error: &GateError) -> FallbackReason {
    match error {
        GateError::PaywallPresentationFailed(message) => FallbackReason::PresentationFailed {
            message: message.clone(),
        },
        GateError::PaywallSkipped(reason) => FallbackReason::Skipped {
            reason: reason.clone(),
        },
        GateError::EntitlementRefreshFailed(_) => FallbackReason::NotConfirmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEntitlementStore, MockPaywallService, TokioClock};
    use crate::domain::access::{
        AccessState, PaywallInfo, PaywallResult, PollSchedule, PurchaseSignal, SkipReason,
    };
    use crate::ports::PaywallError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::Instant;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Doubles
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct RecordingFallbackGate {
        activations: Mutex<Vec<(FallbackReason, Instant)>>,
    }

    impl RecordingFallbackGate {
        fn reasons(&self) -> Vec<FallbackReason> {
            self.activations
                .lock()
                .unwrap()
                .iter()
                .map(|(reason, _)| reason.clone())
                .collect()
        }

        fn first_activation_at(&self) -> Option<Instant> {
            self.activations.lock().unwrap().first().map(|(_, at)| *at)
        }
    }

    #[async_trait]
    impl FallbackGate for RecordingFallbackGate {
        async fn activate(&self, reason: FallbackReason) {
            self.activations.lock().unwrap().push((reason, Instant::now()));
        }
    }

    struct Fixture {
        access: Arc<AccessStateMachine>,
        purchases: Arc<PurchaseSignal>,
        paywall: Arc<MockPaywallService>,
        fallback: Arc<RecordingFallbackGate>,
        orchestrator: PaywallOrchestrator,
        events: mpsc::UnboundedReceiver<PaywallEvent>,
        shutdown: watch::Sender<bool>,
    }

    fn fixture(initial: AccessState) -> Fixture {
        let access = Arc::new(AccessStateMachine::with_state(
            Arc::new(InMemoryEntitlementStore::new()),
            initial,
        ));
        let purchases = Arc::new(PurchaseSignal::new());
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
        let paywall = Arc::new(MockPaywallService::new().with_purchase_signal(purchases.clone()));
        let fallback = Arc::new(RecordingFallbackGate::default());
        let (handler, events) = ChannelPaywallHandler::channel();
        let reconciler = Reconciler::new(
            access.clone(),
            purchases.clone(),
            clock.clone(),
            PollSchedule::default(),
        );
        let orchestrator = PaywallOrchestrator::new(
            access.clone(),
            reconciler,
            paywall.clone(),
            fallback.clone(),
            clock,
            handler,
            PaywallConfig::default(),
        );
        let (shutdown, _rx) = watch::channel(false);
        Fixture {
            access,
            purchases,
            paywall,
            fallback,
            orchestrator,
            events,
            shutdown,
        }
    }

    fn dismissed() -> PaywallEvent {
        PaywallEvent::Dismissed {
            info: PaywallInfo::for_placement("onboarding_complete"),
            result: PaywallResult::Declined,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Presentation Latch
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn presents_once_with_configured_placement() {
        let f = fixture(AccessState::NotSubscribed);

        assert_eq!(f.orchestrator.on_onboarding_complete().await, PresentOutcome::Presented);

        assert_eq!(f.paywall.presented_placements(), vec!["onboarding_complete"]);
        assert!(f.orchestrator.has_attempted());
    }

    #[tokio::test]
    async fn repeated_onboarding_signals_present_at_most_once() {
        let f = fixture(AccessState::Unknown);

        f.orchestrator.on_onboarding_complete().await;
        for _ in 0..5 {
            assert_eq!(
                f.orchestrator.on_onboarding_complete().await,
                PresentOutcome::AlreadyAttempted
            );
        }

        assert_eq!(f.paywall.presentation_count(), 1);
    }

    #[tokio::test]
    async fn already_subscribed_skips_paywall_and_sets_latch() {
        let f = fixture(AccessState::Subscribed);

        assert_eq!(
            f.orchestrator.on_onboarding_complete().await,
            PresentOutcome::AlreadySubscribed
        );

        assert_eq!(f.paywall.presentation_count(), 0);
        assert!(f.orchestrator.has_attempted());
        assert!(f.orchestrator.is_presentation_resolved());
        assert_eq!(
            f.orchestrator.on_onboarding_complete().await,
            PresentOutcome::AlreadyAttempted
        );
    }

    #[tokio::test]
    async fn service_refusal_is_routed_as_error_callback() {
        let mut f = fixture(AccessState::NotSubscribed);
        f.paywall.fail_next(PaywallError::NotConfigured);

        let outcome = f.orchestrator.on_onboarding_complete().await;

        assert_eq!(
            outcome,
            PresentOutcome::Failed("Paywall service not configured".to_string())
        );
        assert_eq!(
            f.events.recv().await,
            Some(PaywallEvent::Errored("Paywall service not configured".to_string()))
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Callback Handling
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn present_callback_changes_nothing() {
        let f = fixture(AccessState::NotSubscribed);

        let outcome = f
            .orchestrator
            .handle_event(
                PaywallEvent::Presented(PaywallInfo::for_placement("onboarding_complete")),
                f.shutdown.subscribe(),
            )
            .await;

        assert_eq!(outcome, None);
        assert_eq!(f.access.current(), AccessState::NotSubscribed);
        assert!(f.fallback.reasons().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_with_pending_purchase_resolves_subscribed() {
        let f = fixture(AccessState::NotSubscribed);
        f.purchases.record_purchase();

        let outcome = f.orchestrator.handle_event(dismissed(), f.shutdown.subscribe()).await;

        assert_eq!(outcome, Some(ResolutionOutcome::ResolvedSubscribed));
        assert_eq!(f.access.current(), AccessState::Subscribed);
        assert!(f.orchestrator.is_presentation_resolved());
        assert!(f.fallback.reasons().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_without_purchase_routes_to_fallback() {
        let f = fixture(AccessState::Unknown);

        let outcome = f.orchestrator.handle_event(dismissed(), f.shutdown.subscribe()).await;

        assert_eq!(outcome, Some(ResolutionOutcome::ResolvedNotSubscribed));
        assert_eq!(f.access.current(), AccessState::NotSubscribed);
        assert_eq!(f.fallback.reasons(), vec![FallbackReason::NotConfirmed]);
        assert!(!f.orchestrator.is_presentation_resolved());
    }

    #[tokio::test(start_paused = true)]
    async fn error_waits_then_routes_to_fallback_once() {
        let f = fixture(AccessState::NotSubscribed);
        let start = Instant::now();

        let outcome = f
            .orchestrator
            .handle_event(PaywallEvent::Errored("network".into()), f.shutdown.subscribe())
            .await;

        assert_eq!(
            outcome,
            Some(ResolutionOutcome::failed(GateError::presentation_failed("network")))
        );
        assert_eq!(
            f.fallback.reasons(),
            vec![FallbackReason::PresentationFailed {
                message: "network".into()
            }]
        );
        let waited = f.fallback.first_activation_at().unwrap() - start;
        assert!(waited >= Duration::from_secs(1) && waited < Duration::from_millis(1005));
    }

    #[tokio::test(start_paused = true)]
    async fn error_resolves_if_subscribed_during_delay() {
        let f = fixture(AccessState::NotSubscribed);
        let access = f.access.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            access.set_subscribed();
        });

        let outcome = f
            .orchestrator
            .handle_event(PaywallEvent::Errored("timeout".into()), f.shutdown.subscribe())
            .await;

        assert_eq!(outcome, Some(ResolutionOutcome::ResolvedSubscribed));
        assert!(f.fallback.reasons().is_empty());
    }

    #[tokio::test]
    async fn skip_routes_to_fallback_unless_subscribed() {
        let f = fixture(AccessState::NotSubscribed);
        let outcome = f
            .orchestrator
            .handle_event(
                PaywallEvent::Skipped(SkipReason::NoAudienceMatch),
                f.shutdown.subscribe(),
            )
            .await;
        assert_eq!(
            outcome,
            Some(ResolutionOutcome::failed(GateError::PaywallSkipped(
                SkipReason::NoAudienceMatch
            )))
        );
        assert_eq!(
            f.fallback.reasons(),
            vec![FallbackReason::Skipped {
                reason: SkipReason::NoAudienceMatch
            }]
        );

        let subscribed = fixture(AccessState::Subscribed);
        let outcome = subscribed
            .orchestrator
            .handle_event(
                PaywallEvent::Skipped(SkipReason::PlacementNotFound),
                subscribed.shutdown.subscribe(),
            )
            .await;
        assert_eq!(outcome, Some(ResolutionOutcome::ResolvedSubscribed));
        assert!(subscribed.fallback.reasons().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_error_delay_leaves_everything_alone() {
        let f = fixture(AccessState::NotSubscribed);
        f.shutdown.send_replace(true);

        let outcome = f
            .orchestrator
            .handle_event(PaywallEvent::Errored("boom".into()), f.shutdown.subscribe())
            .await;

        assert_eq!(outcome, Some(ResolutionOutcome::Failed(FailureReason::Cancelled)));
        assert!(f.fallback.reasons().is_empty());
        assert_eq!(f.access.current(), AccessState::NotSubscribed);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Expiry
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn expiry_withdraws_resolution_and_routes_to_fallback() {
        let f = fixture(AccessState::Subscribed);
        f.orchestrator.on_onboarding_complete().await;
        assert!(f.orchestrator.is_presentation_resolved());
        f.purchases.record_purchase();

        assert_eq!(f.access.refresh().await, Ok(AccessState::NotSubscribed));
        f.orchestrator.on_subscription_expired().await;

        assert!(!f.orchestrator.is_presentation_resolved());
        assert!(!f.purchases.is_pending());
        assert_eq!(f.fallback.reasons(), vec![FallbackReason::NotConfirmed]);
    }

    #[tokio::test]
    async fn expiry_is_ignored_once_access_is_regained() {
        let f = fixture(AccessState::Subscribed);
        f.purchases.record_purchase();

        f.orchestrator.on_subscription_expired().await;

        assert!(f.purchases.is_pending());
        assert!(f.fallback.reasons().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_reacts_to_expiry_observed_by_refresh() {
        let Fixture {
            access,
            fallback,
            orchestrator,
            events,
            shutdown,
            ..
        } = fixture(AccessState::Subscribed);
        let rx = shutdown.subscribe();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            access.refresh().await.unwrap();
            tokio::time::sleep(Duration::from_millis(1)).await;
            shutdown.send_replace(true);
        };
        tokio::join!(orchestrator.run(events, rx), driver);

        assert_eq!(fallback.reasons(), vec![FallbackReason::NotConfirmed]);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Retry
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn unforced_retry_respects_orchestrator_throttle() {
        let f = fixture(AccessState::NotSubscribed);
        f.orchestrator.on_onboarding_complete().await;

        let outcome = f.orchestrator.retry_paywall(false).await;
        assert!(matches!(outcome, PresentOutcome::Throttled { .. }));

        assert_eq!(f.orchestrator.retry_paywall(true).await, PresentOutcome::Presented);
        assert_eq!(f.paywall.presentation_count(), 2);
    }

    #[tokio::test]
    async fn retry_is_a_no_op_when_subscribed() {
        let f = fixture(AccessState::Subscribed);
        assert_eq!(
            f.orchestrator.retry_paywall(true).await,
            PresentOutcome::AlreadySubscribed
        );
        assert_eq!(f.paywall.presentation_count(), 0);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let f = fixture(AccessState::NotSubscribed);
        let Fixture {
            orchestrator,
            events,
            shutdown,
            ..
        } = f;
        let rx = shutdown.subscribe();

        shutdown.send_replace(true);
        orchestrator.run(events, rx).await;
    }
}
