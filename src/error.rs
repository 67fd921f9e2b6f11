use reqwest::{Method, StatusCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RabbitopError>;

#[derive(Error, Debug)]
pub enum RabbitopError {
    /// The liveness probe failed, no resource call was attempted.
    #[error(
        "Could not connect to RabbitMQ at '{base_url}'. Verify that RabbitMQ is up and reachable, \
         or set the management API base URL using set_base_url(..)"
    )]
    BrokerUnavailable { base_url: String },

    /// The broker answered a resource call with a non-success status.
    #[error("{method} {path} failed with status {status}: {body}")]
    ResourceOperation {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("{:?}", .0)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid management API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// `.` and `..` cannot be carried in a URL path segment.
    #[error("'{0}' cannot be addressed through the management API")]
    UnaddressableName(String),
}

impl RabbitopError {
    /// HTTP status carried by the error, if the broker answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RabbitopError::ResourceOperation { status, .. } => Some(*status),
            RabbitopError::Transport(error) => error.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, RabbitopError::BrokerUnavailable { .. })
    }
}
