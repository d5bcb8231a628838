use std::collections::HashMap;

use crate::coordinator::NodeRecord;
use crate::snapshot::job::Job;
use crate::snapshot::worker::Worker;

/// One complete picture of the cluster, rebuilt on every poll and replaced
/// as a whole.
///
/// Jobs live once in an internal store; the global timeline and each
/// worker's timeline are orderings over that store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Poll tick that produced this snapshot. Zero before the first poll.
    pub sequence: u64,
    jobs: Vec<Job>,
    by_id: HashMap<String, usize>,
    timeline: Vec<usize>,
    workers: Vec<Worker>,
    error_message: String,
}

impl Snapshot {
    /// Empty snapshot shown before the first poll completes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot carrying only an error: no jobs and no workers.
    pub fn failed(sequence: u64, message: impl Into<String>) -> Self {
        Self {
            sequence,
            error_message: message.into(),
            ..Self::default()
        }
    }

    /// Build a snapshot from the coordinator's node list.
    ///
    /// Jobs are ordered by start time, most recent first, both globally and
    /// per worker. Workers are ordered by id, descending.
    pub fn from_nodes(sequence: u64, nodes: Vec<NodeRecord>) -> Self {
        let mut jobs = Vec::new();
        let mut workers = Vec::with_capacity(nodes.len());

        for mut node in nodes {
            let mut worker = Worker::shell(&node);
            for record in node.jobs.drain(..) {
                worker.job_order.push(jobs.len());
                jobs.push(Job::from_record(record, &node.name));
            }
            sort_by_start_desc(&mut worker.job_order, &jobs);
            workers.push(worker);
        }

        let mut timeline: Vec<usize> = (0..jobs.len()).collect();
        sort_by_start_desc(&mut timeline, &jobs);

        workers.sort_by(|a, b| b.id.cmp(&a.id));

        let mut by_id = HashMap::with_capacity(jobs.len());
        for (idx, job) in jobs.iter().enumerate() {
            by_id.entry(job.id.clone()).or_insert(idx);
        }

        Self {
            sequence,
            jobs,
            by_id,
            timeline,
            workers,
            error_message: String::new(),
        }
    }

    /// Empty when the poll that produced this snapshot succeeded.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Every job across all workers, most recent start first.
    pub fn all_jobs(&self) -> impl ExactSizeIterator<Item = &Job> + '_ {
        self.timeline.iter().map(move |&idx| &self.jobs[idx])
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Jobs of one worker from this snapshot, most recent start first.
    pub fn jobs_of<'a>(
        &'a self,
        worker: &'a Worker,
    ) -> impl ExactSizeIterator<Item = &'a Job> + 'a {
        worker.job_order.iter().map(move |&idx| &self.jobs[idx])
    }

    /// At most `limit` of the worker's most recent jobs.
    pub fn recent_jobs_of<'a>(
        &'a self,
        worker: &'a Worker,
        limit: usize,
    ) -> impl Iterator<Item = &'a Job> + 'a {
        self.jobs_of(worker).take(limit)
    }

    /// Look a job up by its full id.
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.by_id.get(id).map(|&idx| &self.jobs[idx])
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }
}

/// Descending, by plain string comparison of the start timestamp.
fn sort_by_start_desc(order: &mut [usize], jobs: &[Job]) {
    order.sort_by(|&a, &b| jobs[b].start_time.cmp(&jobs[a].start_time));
}
