//! Connectivity backed by a tokio watch channel.

use tokio::sync::watch;

use crate::ports::NetworkStatus;

/// Network status fed by whatever reachability monitor the host provides.
#[derive(Debug)]
pub struct WatchNetworkStatus {
    tx: watch::Sender<bool>,
}

impl WatchNetworkStatus {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    /// Publishes a connectivity change. Repeated values do not notify.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "Connectivity changed");
        }
    }
}

impl NetworkStatus for WatchNetworkStatus {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
