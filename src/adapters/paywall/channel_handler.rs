//! Paywall handler that forwards callbacks as messages.
//!
//! The paywall service may call back from any task. This handler turns
//! each callback into a `PaywallEvent` on an unbounded channel so a single
//! consumer handles them in order.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::access::{PaywallEvent, PaywallInfo, PaywallResult, SkipReason};
use crate::ports::PaywallHandler;

#[derive(Debug, Clone)]
pub struct ChannelPaywallHandler {
    tx: mpsc::UnboundedSender<PaywallEvent>,
}

impl ChannelPaywallHandler {
    pub fn new(tx: mpsc::UnboundedSender<PaywallEvent>) -> Self {
        Self { tx }
    }

    /// Creates a handler together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PaywallEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, event: PaywallEvent) {
        let kind = event.kind();
        if self.tx.send(event).is_err() {
            tracing::debug!(kind, "Paywall event dropped, consumer has shut down");
        }
    }
}

#[async_trait]
impl PaywallHandler for ChannelPaywallHandler {
    async fn on_present(&self, info: PaywallInfo) {
        self.forward(PaywallEvent::Presented(info));
    }

    async fn on_dismiss(&self, info: PaywallInfo, result: PaywallResult) {
        self.forward(PaywallEvent::Dismissed { info, result });
    }

    async fn on_error(&self, error: String) {
        self.forward(PaywallEvent::Errored(error));
    }

    async fn on_skip(&self, reason: SkipReason) {
        self.forward(PaywallEvent::Skipped(reason));
    }
}
