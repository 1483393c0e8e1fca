//! Purchase completion signal.
//!
//! A one-slot mailbox between the commerce SDK's purchase delegate and the
//! reconciliation loop. The delegate deposits a completion; whichever reader
//! takes it first consumes it, and every other reader sees an empty slot.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "a purchase just completed" flag with read-and-clear consumption.
///
/// Shared as `Arc<PurchaseSignal>` between the delegate and the gate.
#[derive(Debug, Default)]
pub struct PurchaseSignal {
    completed: AtomicBool,
}

impl PurchaseSignal {
    /// Creates an empty signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a purchase transaction completed.
    ///
    /// Called from the purchase delegate. Recording twice before a
    /// consumer takes the signal still yields a single consumption.
    pub fn record_purchase(&self) {
        let was_set = self.completed.swap(true, Ordering::AcqRel);
        tracing::debug!(already_pending = was_set, "Purchase completion recorded");
    }

    /// Consumes the signal, returning true if a completion was pending.
    ///
    /// The swap makes read and clear one atomic step, so two racing
    /// readers can never both observe `true`.
    pub fn take(&self) -> bool {
        self.completed.swap(false, Ordering::AcqRel)
    }

    /// Peeks at the signal without consuming it.
    pub fn is_pending(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}
