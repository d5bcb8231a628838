use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::address::ApiServer;
use crate::coordinator::Coordinator;

/// Outcome of one paced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitReport {
    /// Job-creation requests issued
    pub issued: u32,
    /// True if the run was stopped before issuing all requests
    pub cancelled: bool,
}

/// Convert a seconds value into a pause. Negative and NaN values become zero;
/// values too large for a `Duration`, infinity included, saturate.
pub fn pause_duration(interval_secs: f64) -> Duration {
    if interval_secs.is_nan() || interval_secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(interval_secs).unwrap_or(Duration::MAX)
}

/// Issue `quantity` job-creation requests, pausing `interval_secs` after each.
///
/// Requests are fire-and-forget: each one runs on its own task and only logs
/// its outcome, so a failing or slow coordinator never stalls the pacing.
/// The address is read before every request, so a change mid-run redirects
/// the remaining requests.
///
/// Cancelling `token` ends the run at the next request or pause and abandons
/// requests still in flight.
pub async fn run_paced(
    coordinator: Arc<dyn Coordinator>,
    api_server: ApiServer,
    quantity: u32,
    interval_secs: f64,
    token: CancellationToken,
) -> SubmitReport {
    let mut report = SubmitReport::default();
    if quantity == 0 {
        return report;
    }

    let pause = pause_duration(interval_secs);
    tracing::info!(
        api_server = %api_server.get(),
        quantity,
        interval_ms = pause.as_millis() as u64,
        "Starting job submission"
    );

    for n in 1..=quantity {
        if token.is_cancelled() {
            report.cancelled = true;
            break;
        }

        tokio::spawn(submit_one(
            coordinator.clone(),
            api_server.get(),
            n,
            token.clone(),
        ));
        report.issued += 1;

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                report.cancelled = n < quantity;
                break;
            }
            _ = tokio::time::sleep(pause) => {}
        }
    }

    if report.cancelled {
        tracing::info!(issued = report.issued, quantity, "Job submission cancelled");
    } else {
        tracing::info!(issued = report.issued, "Job submission finished");
    }
    report
}

async fn submit_one(
    coordinator: Arc<dyn Coordinator>,
    api_server: String,
    n: u32,
    token: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!(n, "Abandoned job request");
        }
        result = coordinator.new_job(&api_server) => match result {
            Ok(ack) => tracing::info!(n, ack = %ack, "Job requested"),
            Err(e) => {
                tracing::warn!(n, api_server = %api_server, error = %e, "Job request failed")
            }
        }
    }
}
