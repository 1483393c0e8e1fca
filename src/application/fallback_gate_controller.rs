//! FallbackGateController - Blocking gate for unconfirmed access.
//!
//! Shown when the onboarding paywall could not confirm a subscription.
//! What it displays follows from the access state and connectivity (see
//! `FallbackPresentation`). While showing the paywall affordance it makes
//! automatic attempts, spaced by its own throttle, whenever the gate comes
//! up, connectivity returns or the app comes to the foreground. It removes
//! itself as soon as the access state turns `Subscribed`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use super::access_state_machine::AccessStateMachine;
use super::present_outcome::PresentOutcome;
use super::shutdown;
use crate::adapters::paywall::ChannelPaywallHandler;
use crate::domain::access::{AttemptDecision, FallbackPresentation, PresentationAttempt};
use crate::ports::{Clock, FallbackGate, FallbackReason, NetworkStatus, PaywallHandler, PaywallService};

pub struct FallbackGateController {
    access: Arc<AccessStateMachine>,
    network: Arc<dyn NetworkStatus>,
    paywall: Arc<dyn PaywallService>,
    clock: Arc<dyn Clock>,
    handler: ChannelPaywallHandler,
    placement: String,
    throttle: Mutex<PresentationAttempt>,
    active: watch::Sender<bool>,
    last_reason: Mutex<Option<FallbackReason>>,
}

impl FallbackGateController {
    pub fn new(
        access: Arc<AccessStateMachine>,
        network: Arc<dyn NetworkStatus>,
        paywall: Arc<dyn PaywallService>,
        clock: Arc<dyn Clock>,
        handler: ChannelPaywallHandler,
        placement: impl Into<String>,
        auto_retry_interval: std::time::Duration,
    ) -> Self {
        let (active, _rx) = watch::channel(false);
        Self {
            access,
            network,
            paywall,
            clock,
            handler,
            placement: placement.into(),
            throttle: Mutex::new(PresentationAttempt::new(auto_retry_interval)),
            active,
            last_reason: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Why the gate was last brought up.
    pub fn last_reason(&self) -> Option<FallbackReason> {
        self.last_reason
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// What the gate shows for the current access state and connectivity.
    pub fn presentation(&self) -> FallbackPresentation {
        FallbackPresentation::derive(self.access.current(), self.network.is_online())
    }

    /// Presents the paywall from the gate.
    ///
    /// Unforced attempts respect the gate's retry interval.
    pub async fn attempt_paywall(&self, force: bool) -> PresentOutcome {
        if !self.is_active() {
            return PresentOutcome::Inactive;
        }
        if self.access.current().is_subscribed() {
            self.dismiss();
            return PresentOutcome::AlreadySubscribed;
        }
        if !self.network.is_online() {
            tracing::debug!(force, "Offline, not presenting paywall from fallback gate");
            return PresentOutcome::Offline;
        }

        let decision = self
            .throttle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .try_begin(self.clock.now(), force);
        if let AttemptDecision::Suppressed { retry_in } = decision {
            tracing::debug!(retry_in_ms = retry_in.as_millis() as u64, "Fallback paywall attempt throttled");
            return PresentOutcome::Throttled { retry_in };
        }

        tracing::info!(placement = %self.placement, force, "Presenting paywall from fallback gate");
        let handler: Arc<dyn PaywallHandler> = Arc::new(self.handler.clone());
        match self.paywall.present(&self.placement, handler).await {
            Ok(()) => PresentOutcome::Presented,
            Err(e) => {
                tracing::warn!(error = %e, "Fallback paywall presentation failed");
                PresentOutcome::Failed(e.to_string())
            }
        }
    }

    /// Manual retry from the gate.
    ///
    /// Re-checks entitlement first, then forces a presentation if access is
    /// still not confirmed.
    pub async fn retry(&self) -> PresentOutcome {
        if !self.is_active() {
            return PresentOutcome::Inactive;
        }
        if let Err(e) = self.access.refresh().await {
            tracing::debug!(error = %e, "Refresh during manual retry failed");
        }
        self.attempt_paywall(true).await
    }

    /// Connectivity changed. Regaining it triggers an automatic attempt.
    pub async fn on_network_changed(&self, online: bool) -> Option<PresentOutcome> {
        if !online || !self.is_active() {
            return None;
        }
        tracing::debug!("Connectivity regained while fallback gate is up");
        Some(self.auto_attempt().await)
    }

    /// App returned to the foreground.
    pub async fn on_became_active(&self) -> Option<PresentOutcome> {
        if !self.is_active() {
            return None;
        }
        Some(self.auto_attempt().await)
    }

    /// Watches access and connectivity until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut access_rx = self.access.subscribe();
        let mut network_rx = self.network.subscribe();

        loop {
            tokio::select! {
                _ = shutdown::requested(&mut shutdown) => {
                    tracing::debug!("Fallback gate controller shutting down");
                    return;
                }
                changed = access_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let state = *access_rx.borrow_and_update();
                    if state.is_subscribed() {
                        self.dismiss();
                    }
                }
                changed = network_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let online = *network_rx.borrow_and_update();
                    self.on_network_changed(online).await;
                }
            }
        }
    }

    /// Removes the gate.
    pub fn dismiss(&self) {
        if self.active.send_if_modified(|active| std::mem::replace(active, false)) {
            tracing::info!("Access confirmed, fallback gate dismissed");
        }
    }

    async fn auto_attempt(&self) -> PresentOutcome {
        if self.presentation() == FallbackPresentation::CheckingSubscription {
            if let Err(e) = self.access.refresh().await {
                tracing::debug!(error = %e, "Entitlement still undetermined");
            }
        }

        match self.presentation() {
            FallbackPresentation::ShowPaywall => self.attempt_paywall(false).await,
            FallbackPresentation::Dismissed => {
                self.dismiss();
                PresentOutcome::AlreadySubscribed
            }
            FallbackPresentation::RequiresConnection => PresentOutcome::Offline,
            FallbackPresentation::CheckingSubscription => PresentOutcome::Undetermined,
        }
    }
}

#[async_trait]
impl FallbackGate for FallbackGateController {
    async fn activate(&self, reason: FallbackReason) {
        tracing::info!(reason = ?reason, state = ?self.access.current(), "Fallback gate activated");
        *self
            .last_reason
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(reason);
        self.active.send_if_modified(|active| !std::mem::replace(active, true));

        let outcome = self.auto_attempt().await;
        tracing::debug!(?outcome, presentation = ?self.presentation(), "Fallback gate settled");
    }
}
