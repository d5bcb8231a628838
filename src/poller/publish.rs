use std::sync::Arc;

use tokio::sync::watch;

use crate::snapshot::Snapshot;

/// Write side of the published snapshot.
///
/// A snapshot replaces the current one only if it comes from a later tick,
/// so a slow response can never overwrite a newer one.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: Arc<watch::Sender<Arc<Snapshot>>>,
}

impl Publisher {
    pub fn new() -> (Self, SnapshotReader) {
        let (tx, rx) = watch::channel(Arc::new(Snapshot::empty()));
        (Self { tx: Arc::new(tx) }, SnapshotReader { rx })
    }

    /// Returns false when the snapshot was discarded as stale.
    pub fn publish(&self, snapshot: Snapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if snapshot.sequence <= current.sequence {
                return false;
            }
            *current = Arc::new(snapshot);
            true
        })
    }
}

/// Read-only view of the latest published snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<Snapshot>>,
}

impl SnapshotReader {
    pub fn current(&self) -> Arc<Snapshot> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published snapshot. Returns `None` once the poller
    /// is gone and nothing more will be published.
    pub async fn changed(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_snapshot_is_discarded() {
        let (publisher, reader) = Publisher::new();
        assert!(publisher.publish(Snapshot::failed(2, "second")));
        assert!(!publisher.publish(Snapshot::failed(1, "first")));
        assert_eq!(reader.current().error_message(), "second");
    }

    #[test]
    fn later_snapshot_replaces_whole_state() {
        let (publisher, reader) = Publisher::new();
        publisher.publish(Snapshot::failed(1, "down"));
        publisher.publish(Snapshot::from_nodes(2, Vec::new()));
        let current = reader.current();
        assert!(!current.is_error());
        assert_eq!(current.sequence, 2);
    }

    #[tokio::test]
    async fn changed_returns_none_after_publisher_dropped() {
        let (publisher, mut reader) = Publisher::new();
        publisher.publish(Snapshot::failed(1, "down"));
        let snap = reader.changed().await.unwrap();
        assert_eq!(snap.error_message(), "down");

        drop(publisher);
        assert!(reader.changed().await.is_none());
    }
}
