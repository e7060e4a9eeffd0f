use std::time::Duration;
use thiserror::Error;

/// Failures of the endpoint resolution and request execution path.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lookup miss or cancelled interactive selection. The two are not
    /// distinguished.
    #[error("Invalid selection.")]
    InvalidSelection,

    /// Malformed method, URL or header; no request was attempted.
    #[error("Error creating request: {0}")]
    RequestConstruction(String),

    /// DNS, connect, TLS or protocol failure while exchanging the request.
    #[error("Error making request: {0}")]
    Transport(String),

    /// The exchange did not finish inside the configured timeout.
    #[error("Error making request: timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The body stream broke after the response head was received.
    #[error("Error reading response: {0}")]
    ResponseRead(String),
}

impl ApiError {
    /// True for every failure raised by the network exchange itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}
