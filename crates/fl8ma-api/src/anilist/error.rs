use thiserror::Error;

/// Errors raised by a [`TransportChannel`](crate::TransportChannel).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("service error: {}", .messages.join("; "))]
    Service {
        status: Option<u16>,
        messages: Vec<String>,
    },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, timeouts, rate limiting and server errors are
    /// transient; query errors and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Service { .. } | Self::Malformed(_) => false,
        }
    }
}

/// Why a client operation produced no data.
///
/// Public operations turn every variant into an empty or absent value;
/// the `try_*` operations expose it for diagnostics and tests.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(TransportError),

    #[error("service error: {0}")]
    Service(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("media {0} not found")]
    NotFound(u64),
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Service { messages, .. } => Self::Service(messages.join("; ")),
            TransportError::Malformed(msg) => Self::Parse(msg),
            other => Self::Transport(other),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
