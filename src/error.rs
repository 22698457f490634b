// Error types for the handshake, credential storage and report fetching
use reqwest::StatusCode;
use thiserror::Error;

/// Credential file could not be written (or its location resolved)
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("HOME environment variable not set")]
    MissingHome,

    #[error("Credential file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures of the one-time read token exchange. All of them are fatal to startup.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Read token cannot be empty")]
    EmptyToken,

    #[error("Read token rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Auth endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed auth response: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors from authenticated report calls
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Malformed response body: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Transport failure or non-2xx response
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ClientError::Parse(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Parse(error.to_string())
        } else {
            ClientError::Network(error)
        }
    }
}

/// A command failure whose message was already written through the selected
/// output format. `main` only sets the exit status for it.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AlreadyReported(pub String);
