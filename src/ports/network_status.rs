//! NetworkStatus port - Push-updated connectivity.

use tokio::sync::watch;

/// Observable connectivity flag.
pub trait NetworkStatus: Send + Sync {
    /// Current connectivity.
    fn is_online(&self) -> bool;

    /// Receiver that is notified whenever connectivity changes.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
