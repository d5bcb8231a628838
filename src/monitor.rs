use std::sync::Arc;

use crate::address::ApiServer;
use crate::config::WatchConfig;
use crate::coordinator::{Coordinator, HttpCoordinator};
use crate::error::Result;
use crate::poller::{PollHandle, Poller, SnapshotReader};
use crate::snapshot::Snapshot;
use crate::submit::{SubmissionHandle, Submitter};

/// Entry point for anything that displays the cluster.
///
/// Owns the running poller and the submitter, and exposes:
/// - a read-only view of the latest [`Snapshot`]
/// - [`Monitor::submit`] to start a paced submission run
/// - [`Monitor::set_api_server`] to point both at another coordinator
///
/// The poller stops when the monitor is shut down or dropped.
pub struct Monitor {
    api_server: ApiServer,
    poller: PollHandle,
    submitter: Submitter,
}

impl Monitor {
    /// Start monitoring over HTTP using `config`.
    pub fn connect(config: &WatchConfig) -> Result<Self> {
        let coordinator = HttpCoordinator::new().with_timeout(config.request_timeout());
        Self::start(Arc::new(coordinator), config)
    }

    /// Start monitoring through any [`Coordinator`] implementation.
    pub fn start(coordinator: Arc<dyn Coordinator>, config: &WatchConfig) -> Result<Self> {
        config.validate()?;

        let api_server = ApiServer::new(config.api_server.clone());
        let poller =
            Poller::new(coordinator.clone(), api_server.clone(), config.poll.clone()).spawn();
        let submitter = Submitter::new(coordinator, api_server.clone());

        Ok(Self {
            api_server,
            poller,
            submitter,
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.poller.current()
    }

    pub fn reader(&self) -> SnapshotReader {
        self.poller.reader()
    }

    pub fn api_server(&self) -> String {
        self.api_server.get()
    }

    /// Takes effect from the next poll tick and the next submission request.
    pub fn set_api_server(&self, address: impl Into<String>) {
        self.api_server.set(address);
    }

    pub async fn submit(&self, quantity: u32, interval_secs: f64) -> SubmissionHandle {
        self.submitter.submit(quantity, interval_secs).await
    }

    /// Stop polling and cancel any submission run in progress.
    pub async fn shutdown(&self) {
        self.poller.stop();
        self.submitter.cancel_active().await;
    }

    pub fn is_running(&self) -> bool {
        !self.poller.is_stopped()
    }
}
