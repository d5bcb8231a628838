use serde::Serialize;

use crate::snapshot::job::Job;
use crate::snapshot::store::Snapshot;

/// Display row for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    /// Short id
    pub id: String,
    pub worker: String,
    pub duration: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "finishTime")]
    pub finish_time: String,
    pub state: String,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        Self {
            id: job.short_id().to_string(),
            worker: job.worker_name.clone(),
            duration: job.duration_display(),
            start_time: job.start_time_display(),
            finish_time: job.finish_time_display(),
            state: job.state().glyph().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerView {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub jobscount: i64,
    pub jobs: Vec<JobView>,
}

/// Serializable form of a [`Snapshot`]: the global job timeline, the
/// per-worker timelines and the error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotView {
    pub sequence: u64,
    #[serde(rename = "allJobs")]
    pub all_jobs: Vec<JobView>,
    pub workers: Vec<WorkerView>,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl SnapshotView {
    /// `recent` caps each worker's job list; `None` keeps all of them.
    pub fn new(snapshot: &Snapshot, recent: Option<usize>) -> Self {
        Self {
            sequence: snapshot.sequence,
            all_jobs: snapshot.all_jobs().map(JobView::from).collect(),
            workers: worker_views(snapshot, recent),
            error_message: snapshot.error_message().to_string(),
        }
    }
}

pub fn worker_views(snapshot: &Snapshot, recent: Option<usize>) -> Vec<WorkerView> {
    snapshot
        .workers()
        .iter()
        .map(|w| WorkerView {
            id: w.id.clone(),
            name: w.name.clone(),
            ip: w.address.clone(),
            jobscount: w.job_count,
            jobs: snapshot
                .recent_jobs_of(w, recent.unwrap_or(usize::MAX))
                .map(JobView::from)
                .collect(),
        })
        .collect()
}
