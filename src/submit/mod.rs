//! Paced job submission.
//!
//! [`run_paced`] issues a fixed number of job-creation requests separated by
//! a fixed pause. [`Submitter`] runs it in the background and makes sure only
//! one run is active at a time: starting a new run cancels the previous one.

pub mod pacer;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::address::ApiServer;
use crate::coordinator::Coordinator;

pub use pacer::{pause_duration, run_paced, SubmitReport};

/// Starts paced submission runs against the current coordinator address.
#[derive(Clone)]
pub struct Submitter {
    coordinator: Arc<dyn Coordinator>,
    api_server: ApiServer,
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl Submitter {
    pub fn new(coordinator: Arc<dyn Coordinator>, api_server: ApiServer) -> Self {
        Self {
            coordinator,
            api_server,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a run of `quantity` requests, `interval_secs` apart, in the
    /// background. A run already in progress is cancelled first.
    pub async fn submit(&self, quantity: u32, interval_secs: f64) -> SubmissionHandle {
        let token = CancellationToken::new();
        {
            let mut active = self.active.lock().await;
            if let Some(previous) = active.replace(token.clone()) {
                if !previous.is_cancelled() {
                    tracing::info!("Cancelling previous submission run");
                    previous.cancel();
                }
            }
        }

        let task = tokio::spawn(run_paced(
            self.coordinator.clone(),
            self.api_server.clone(),
            quantity,
            interval_secs,
            token.clone(),
        ));

        SubmissionHandle { token, task }
    }

    /// Cancel the run in progress, if any.
    pub async fn cancel_active(&self) {
        if let Some(token) = self.active.lock().await.take() {
            token.cancel();
        }
    }
}

/// Handle to one background submission run.
pub struct SubmissionHandle {
    token: CancellationToken,
    task: JoinHandle<SubmitReport>,
}

impl SubmissionHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end.
    pub async fn wait(self) -> SubmitReport {
        match self.task.await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Submission task failed");
                SubmitReport {
                    issued: 0,
                    cancelled: true,
                }
            }
        }
    }
}
