//! Network status adapters.

mod watch_network;

pub use watch_network::WatchNetworkStatus;
