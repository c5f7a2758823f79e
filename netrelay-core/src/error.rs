use crate::endpoint::Endpoint;
use thiserror::Error;

/// Main error type for relay module operations
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{what} {value} out of range ({min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Network error connecting to {endpoint}: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection to {endpoint} failed")]
    ConnectionFailed { endpoint: Endpoint },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Authentication rejected by device (401 Authorization Required)")]
    Authentication,

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String, raw: Vec<u8> },

    #[error("Decode error in <{field}>: {reason}")]
    Decode { field: String, reason: String },

    #[error("Session has been disposed")]
    Disposed,
}

/// Coarse classification of a [`RelayError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Configuration,
    Range,
    Network,
    ConnectionFailed,
    Io,
    Authentication,
    MalformedResponse,
    Decode,
    Disposed,
}

impl RelayError {
    /// Classify the error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::OutOfRange { .. } => FailureKind::Range,
            Self::Network { .. } => FailureKind::Network,
            Self::ConnectionFailed { .. } => FailureKind::ConnectionFailed,
            Self::Io(_) | Self::Timeout(_) => FailureKind::Io,
            Self::Authentication => FailureKind::Authentication,
            Self::MalformedResponse { .. } => FailureKind::MalformedResponse,
            Self::Decode { .. } => FailureKind::Decode,
            Self::Disposed => FailureKind::Disposed,
        }
    }

    /// Raw response bytes attached to a malformed-response error
    pub fn raw_response(&self) -> Option<&[u8]> {
        match self {
            Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Build an [`RelayError::OutOfRange`] for a 1-based index
    pub fn index_out_of_range(what: &'static str, value: usize, max: usize) -> Self {
        Self::OutOfRange {
            what,
            value: value as i64,
            min: 1,
            max: max as i64,
        }
    }

    pub fn decode(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for relay module operations
pub type RelayResult<T> = Result<T, RelayError>;
