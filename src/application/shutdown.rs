//! Shutdown signalling shared by the long-running services.
//!
//! Services take a `watch::Receiver<bool>`; flipping the sender to `true`
//! tears them down. A dropped sender means nobody can ask for shutdown
//! any more, so waiting on it never completes.

use tokio::sync::watch;

/// Resolves once shutdown has been requested.
pub(crate) async fn requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Non-blocking check.
pub(crate) fn is_requested(rx: &watch::Receiver<bool>) -> bool {
    *rx.borrow()
}
