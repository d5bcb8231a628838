pub mod address;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod monitor;
pub mod poller;
pub mod render;
pub mod shutdown;
pub mod snapshot;
pub mod submit;
