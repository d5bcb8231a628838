//! Polling synchronizer.
//!
//! [`Poller::spawn`] starts a fixed-period tick loop and returns a
//! [`PollHandle`] that owns it. Every tick requests the node list from the
//! coordinator on its own task and publishes the outcome:
//!
//! - success: a fresh [`Snapshot`](crate::snapshot::Snapshot) with an empty
//!   error message
//! - transport or decode failure: an empty snapshot carrying the error
//! - non-2xx status: handled per [`StatusPolicy`](crate::config::StatusPolicy)
//!
//! Requests may overlap when the coordinator is slower than the tick period.
//! Each tick carries a sequence number and [`Publisher`] drops any response
//! older than the one already published.

pub mod handle;
pub mod publish;

pub use handle::{PollHandle, Poller};
pub use publish::{Publisher, SnapshotReader};
