use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::address::ApiServer;
use crate::config::{PollConfig, StatusPolicy};
use crate::coordinator::Coordinator;
use crate::poller::publish::{Publisher, SnapshotReader};
use crate::snapshot::Snapshot;

/// Periodically fetches the cluster state and publishes it as a [`Snapshot`].
pub struct Poller {
    coordinator: Arc<dyn Coordinator>,
    api_server: ApiServer,
    config: PollConfig,
}

impl Poller {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        api_server: ApiServer,
        config: PollConfig,
    ) -> Self {
        Self {
            coordinator,
            api_server,
            config,
        }
    }

    /// Start ticking. The first tick fires immediately.
    ///
    /// Polling continues until the returned handle is stopped or dropped.
    pub fn spawn(self) -> PollHandle {
        let (publisher, reader) = Publisher::new();
        let token = CancellationToken::new();

        tracing::info!(
            api_server = %self.api_server.get(),
            interval_ms = self.config.interval_ms,
            status_policy = %self.config.status_policy,
            "Starting poller"
        );

        let loop_token = token.clone();
        let task = tokio::spawn(async move {
            self.run(publisher, loop_token).await;
        });

        PollHandle {
            token,
            task,
            reader,
        }
    }

    async fn run(self, publisher: Publisher, token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::info!("Poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    sequence += 1;
                    // Each request runs on its own task so a slow coordinator
                    // does not delay the next tick.
                    tokio::spawn(poll_once(
                        self.coordinator.clone(),
                        self.api_server.get(),
                        sequence,
                        self.config.status_policy,
                        publisher.clone(),
                        token.clone(),
                    ));
                }
            }
        }
    }
}

/// One tick: fetch, transform, publish.
async fn poll_once(
    coordinator: Arc<dyn Coordinator>,
    api_server: String,
    sequence: u64,
    policy: StatusPolicy,
    publisher: Publisher,
    token: CancellationToken,
) {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        result = coordinator.get_all_nodes(&api_server) => result,
    };

    let snapshot = match result {
        Ok(nodes) => Snapshot::from_nodes(sequence, nodes),
        Err(e) if e.is_status() && policy == StatusPolicy::Skip => {
            tracing::warn!(api_server = %api_server, sequence, error = %e, "Skipping tick");
            return;
        }
        Err(e) => {
            tracing::warn!(api_server = %api_server, sequence, error = %e, "Poll failed");
            Snapshot::failed(sequence, e.to_string())
        }
    };

    if token.is_cancelled() {
        return;
    }
    if !publisher.publish(snapshot) {
        tracing::debug!(sequence, "Discarded out-of-order poll response");
    }
}

/// Owned handle to a running poller.
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
    reader: SnapshotReader,
}

impl PollHandle {
    pub fn reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.reader.current()
    }

    /// Stop ticking. In-flight requests are abandoned without publishing.
    /// Does not wait for anything.
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            self.token.cancel();
            self.task.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
