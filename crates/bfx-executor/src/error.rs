//! Executor error types.

use std::time::Duration;

use bfx_core::CoreError;
use thiserror::Error;

use crate::client::HttpMethod;

/// Why a request did not produce a usable response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Non-2xx response carrying the venue's `{"code", "msg"}` body.
    #[error("HTTP {status}: venue error {code}: {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("undecodable response body: {0}")]
    Decode(String),

    #[error("request could not be built: {0}")]
    Encode(String),
}

impl TransportError {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
        }
    }
}

/// Failed request, tagged with the method and path that were attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} {path} failed: {cause}")]
pub struct ExecutionError {
    pub method: HttpMethod,
    pub path: String,
    #[source]
    pub cause: TransportError,
}

impl ExecutionError {
    pub fn new(method: HttpMethod, path: impl Into<String>, cause: TransportError) -> Self {
        Self {
            method,
            path: path.into(),
            cause,
        }
    }
}

pub type ExecutorResult<T> = Result<T, ExecutionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("failed to encode parameters: {0}")]
    Encode(String),

    #[error("failed to create HMAC: {0}")]
    Hmac(String),
}

/// Failure of an order placement: rejected locally or by the transport.
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("request timeout must be positive")]
    InvalidTimeout,

    #[error("recv window must be within 1..=60000 ms, got {0}")]
    InvalidRecvWindow(u64),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
