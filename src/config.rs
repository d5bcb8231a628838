use std::time::Duration;

use crate::error::{Result, WatchError};

/// Coordinator address used when none is configured.
pub const DEFAULT_API_SERVER: &str = "localhost:8081";

/// How the poller treats a coordinator that answers with a non-2xx status.
///
/// `Skip` is the coordinator's historical contract; `Surface` treats a
/// status error like any other failed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Clear the snapshot and publish the status as the error message,
    /// the same way transport failures are handled.
    #[default]
    Surface,
    /// Log the status and leave the published snapshot untouched for this tick.
    Skip,
}

impl std::fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusPolicy::Surface => write!(f, "surface"),
            StatusPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Settings for the polling synchronizer.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Tick period in milliseconds
    pub interval_ms: u64,
    pub status_policy: StatusPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            status_policy: StatusPolicy::default(),
        }
    }
}

impl PollConfig {
    /// Tick period, never shorter than one millisecond.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Defaults for a paced submission run.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    pub quantity: u32,
    /// Seconds to wait after each request
    pub interval_secs: f64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            quantity: 5,
            interval_secs: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Coordinator address in `host:port` form, without a scheme
    pub api_server: String,
    /// Timeout for every coordinator request, polls and submissions alike.
    /// `None` lets a hung request wait indefinitely.
    pub request_timeout_ms: Option<u64>,
    pub poll: PollConfig,
    pub submit: SubmitConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            api_server: DEFAULT_API_SERVER.to_string(),
            request_timeout_ms: None,
            poll: PollConfig::default(),
            submit: SubmitConfig::default(),
        }
    }
}

impl WatchConfig {
    pub fn new(api_server: impl Into<String>) -> Self {
        Self {
            api_server: api_server.into(),
            ..Default::default()
        }
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll.interval_ms = interval_ms;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.poll.status_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_ms == 0 {
            return Err(WatchError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(WatchError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build the URL of a coordinator endpoint. The scheme is always plain HTTP.
pub fn endpoint_url(api_server: &str, path: &str) -> String {
    format!("http://{}/{}", api_server, path.trim_start_matches('/'))
}
