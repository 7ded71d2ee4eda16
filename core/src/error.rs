//! Error types for the Drip orders client.
//!
//! # Design
//! Two families, split by where they surface:
//! - `ClientError` is a caller mistake detected before any network I/O
//!   (missing order id, bad configuration). The facade returns it as `Err`.
//! - `TransportError` is a network-level failure reported by a `Transport`.
//!   It never escapes the facade; the normalizer folds it into a `Response`.
//!
//! HTTP error statuses are neither. A 4xx/5xx from the server is an ordinary
//! `Response`.

use thiserror::Error;

/// Errors raised synchronously, before a request is sent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A parameter required to build the request path was absent or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// `ClientConfig::validate` rejected the configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request envelope could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Network-level failures reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The host could not be resolved or the connection was refused.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A connect or overall deadline elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Reading or writing the socket failed mid-exchange.
    #[error("i/o error: {0}")]
    Io(String),

    /// Anything else the transport could not turn into a status and body,
    /// such as a malformed response.
    #[error("transport failure: {0}")]
    Other(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match &err {
            ureq::Error::Timeout(_) => TransportError::Timeout(err.to_string()),
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
                TransportError::Connection(err.to_string())
            }
            ureq::Error::Io(io) => match io.kind() {
                std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted => {
                    TransportError::Connection(io.to_string())
                }
                std::io::ErrorKind::TimedOut => TransportError::Timeout(io.to_string()),
                _ => TransportError::Io(io.to_string()),
            },
            _ => TransportError::Other(err.to_string()),
        }
    }
}
