//! Boundary with the remote coordinator.
//!
//! - [`wire`]: JSON records returned by `getallnodes`
//! - [`client`]: the [`Coordinator`] trait and its HTTP implementation

pub mod client;
pub mod wire;

pub use client::{Coordinator, HttpCoordinator};
pub use wire::{JobRecord, NodeRecord, NodesResponse};
