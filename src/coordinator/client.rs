use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::endpoint_url;
use crate::coordinator::wire::{NodeRecord, NodesResponse};
use crate::error::{Result, WatchError};

pub const GET_ALL_NODES_PATH: &str = "getallnodes";
pub const NEW_JOB_PATH: &str = "newjob";

/// The two coordinator calls this client depends on.
///
/// The address is passed per call because it can change at runtime.
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Fetch every node with its jobs.
    async fn get_all_nodes(&self, api_server: &str) -> Result<Vec<NodeRecord>>;

    /// Ask the coordinator to start one new job. The acknowledgement is
    /// returned as-is; its content is not interpreted.
    async fn new_job(&self, api_server: &str) -> Result<Value>;
}

/// [`Coordinator`] over plain HTTP: `POST http://<address>/<endpoint>` with an
/// empty JSON object as body.
#[derive(Debug, Clone)]
pub struct HttpCoordinator {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Default for HttpCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpCoordinator {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_empty(&self, api_server: &str, path: &str) -> Result<Vec<u8>> {
        let url = endpoint_url(api_server, path);
        let mut request = self.client.post(&url).json(&json!({}));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, "Coordinator returned error status");
            return Err(WatchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Coordinator for HttpCoordinator {
    async fn get_all_nodes(&self, api_server: &str) -> Result<Vec<NodeRecord>> {
        let body = self.post_empty(api_server, GET_ALL_NODES_PATH).await?;
        let parsed: NodesResponse = serde_json::from_slice(&body)?;
        Ok(parsed.nodes)
    }

    async fn new_job(&self, api_server: &str) -> Result<Value> {
        let body = self.post_empty(api_server, NEW_JOB_PATH).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

