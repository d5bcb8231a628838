use crate::coordinator::NodeRecord;

/// A worker node and the positions of its jobs in the snapshot's job store.
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// `ip:port`
    pub address: String,
    /// Job count as reported by the coordinator. Independent of the job list.
    pub job_count: i64,
    pub(crate) job_order: Vec<usize>,
}

impl Worker {
    pub(crate) fn shell(node: &NodeRecord) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            address: format!("{}:{}", node.ip, node.port),
            job_count: node.jobscount,
            job_order: Vec::new(),
        }
    }

    /// Number of jobs listed under this worker.
    pub fn listed_jobs(&self) -> usize {
        self.job_order.len()
    }
}
