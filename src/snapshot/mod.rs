//! Snapshot model: coordinator node lists turned into display-ready views.
//!
//! A [`Snapshot`] keeps every job once and exposes two orderings over it:
//! the global timeline ([`Snapshot::all_jobs`]) and one timeline per
//! [`Worker`] ([`Snapshot::jobs_of`]). Both are sorted by start time, most
//! recent first. Nothing here performs I/O.

pub mod job;
pub mod store;
pub mod view;
pub mod worker;

pub use job::{Job, JobState};
pub use store::Snapshot;
pub use view::{JobView, SnapshotView, WorkerView};
pub use worker::Worker;
