//! Plain-text tables for the terminal.
//!
//! When the snapshot carries an error, only the error banner is rendered,
//! never a table.

use std::fmt::Write;

use crate::snapshot::{Job, Snapshot};

pub const NO_JOBS: &str =
    "There are no jobs started.\nRun a new job and it immediately appeared in this list";
pub const NO_WORKERS: &str = "There is no workers registered in the repository.";
pub const NO_WORKER_JOBS: &str = "There is no jobs for this worker.";

pub fn render_error(message: &str) -> String {
    format!(
        "{}\nPlease change the API server address (--apiserver) and try again.\n",
        message
    )
}

/// The global job timeline.
pub fn render_jobs(snapshot: &Snapshot) -> String {
    if snapshot.is_error() {
        return render_error(snapshot.error_message());
    }
    if snapshot.job_count() == 0 {
        return format!("{}\n", NO_JOBS);
    }
    job_table(snapshot.all_jobs())
}

/// One block per worker with its own job table. `recent` caps each list.
pub fn render_workers(snapshot: &Snapshot, recent: Option<usize>) -> String {
    if snapshot.is_error() {
        return render_error(snapshot.error_message());
    }
    if snapshot.workers().is_empty() {
        return format!("{}\n", NO_WORKERS);
    }

    let mut out = String::new();
    for worker in snapshot.workers() {
        let _ = writeln!(out, "{:<38} {:<16} {:<22} JOBS", "WORKER ID", "NAME", "ADDRESS");
        let _ = writeln!(
            out,
            "{:<38} {:<16} {:<22} {}",
            worker.id, worker.name, worker.address, worker.job_count
        );
        if worker.listed_jobs() == 0 {
            let _ = writeln!(out, "{}", NO_WORKER_JOBS);
        } else {
            let limit = recent.unwrap_or(usize::MAX);
            out.push_str(&job_table(snapshot.recent_jobs_of(worker, limit)));
        }
        out.push('\n');
    }
    out
}

fn job_table<'a>(jobs: impl Iterator<Item = &'a Job>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<16} {:>10} {:<20} {:<20} {}",
        "ID", "WORKER", "DURATION", "START TIME", "FINISH TIME", "✓"
    );
    let _ = writeln!(out, "{}", "-".repeat(82));
    for job in jobs {
        let _ = writeln!(
            out,
            "{:<10} {:<16} {:>10} {:<20} {:<20} {}",
            job.short_id(),
            job.worker_name,
            job.duration_display(),
            job.start_time_display(),
            job.finish_time_display(),
            job.state().glyph()
        );
    }
    out
}
