use std::sync::Arc;

use tokio::sync::watch;

/// Shared, runtime-editable coordinator address (`host:port`).
///
/// Readers take a copy at the start of each request, so a change applies
/// from the next poll tick or submission onwards.
#[derive(Debug, Clone)]
pub struct ApiServer {
    tx: Arc<watch::Sender<String>>,
}

impl ApiServer {
    pub fn new(address: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(address.into());
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn set(&self, address: impl Into<String>) {
        let address = address.into();
        tracing::info!(api_server = %address, "Coordinator address changed");
        self.tx.send_replace(address);
    }
}
