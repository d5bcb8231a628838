use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Coordinator responded with HTTP status {0}")]
    Status(u16),

    #[error("Malformed coordinator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// True when the coordinator was reachable but answered with a non-2xx status.
    pub fn is_status(&self) -> bool {
        matches!(self, WatchError::Status(_))
    }
}

impl From<reqwest::Error> for WatchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return WatchError::Status(status.as_u16());
        }
        WatchError::Transport(error_chain(&err))
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, WatchError>;
