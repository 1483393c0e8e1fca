//! One-shot presentation latch.

use std::sync::atomic::{AtomicBool, Ordering};

/// Records whether the onboarding paywall has already been attempted.
///
/// Once acquired it stays set for the lifetime of its owner.
#[derive(Debug, Default)]
pub struct PresentationLatch {
    attempted: AtomicBool,
}

impl PresentationLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latch, returning true only for the caller that set it.
    pub fn try_acquire(&self) -> bool {
        self.attempted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_set(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }
}
