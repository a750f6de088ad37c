//! Error types for control plane calls.
//!
//! Remote failures carry the Connect error code so callers can tell a
//! missing object apart from every other failure. Errors are also
//! categorized for retry decisions and user feedback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias for control plane operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Connect protocol error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    /// Wire name of the code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
            Self::InvalidArgument => "invalid_argument",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::ResourceExhausted => "resource_exhausted",
            Self::FailedPrecondition => "failed_precondition",
            Self::Aborted => "aborted",
            Self::OutOfRange => "out_of_range",
            Self::Unimplemented => "unimplemented",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
            Self::DataLoss => "data_loss",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// Code implied by an HTTP status when the body carries none.
    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::Internal,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::Unimplemented,
            429 | 502 | 503 | 504 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of control plane errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// The requested object does not exist.
    NotFound,
    /// Credentials were rejected or could not be obtained.
    Auth,
    /// The request was rejected as invalid.
    Invalid,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Object not found",
            Self::Auth => "Authentication failed",
            Self::Invalid => "Request rejected",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the deployment API URL and your connection, then try again",
            Self::NotFound => "The object may have been deleted outside of configuration",
            Self::Auth => "Check the OIDC client ID, client secret and issuer",
            Self::Invalid => "Check the configured values against the control plane",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during control plane calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with a Connect error.
    #[error("{procedure}: {code}: {message}")]
    Rpc {
        /// Fully qualified procedure, e.g. `pkg.Service/Method`.
        procedure: String,
        code: Code,
        message: String,
    },

    /// HTTP request failed before an answer was received.
    #[error("HTTP request failed: {message}")]
    Http {
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Token acquisition failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid response from the API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create an RPC error.
    pub fn rpc(procedure: impl Into<String>, code: Code, message: impl Into<String>) -> Self {
        Self::Rpc {
            procedure: procedure.into(),
            code,
            message: message.into(),
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Connect code of a remote failure.
    #[must_use]
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the API reported that the object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(Code::NotFound)
    }

    /// Get the error category for retry logic.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Rpc { code, .. } => match code {
                Code::NotFound => ErrorCategory::NotFound,
                Code::Unavailable | Code::DeadlineExceeded | Code::Aborted => {
                    ErrorCategory::Network
                }
                Code::Unauthenticated | Code::PermissionDenied => ErrorCategory::Auth,
                Code::InvalidArgument
                | Code::FailedPrecondition
                | Code::AlreadyExists
                | Code::OutOfRange => ErrorCategory::Invalid,
                _ => ErrorCategory::Other,
            },
            Error::Http { .. } => ErrorCategory::Network,
            Error::Auth(_) => ErrorCategory::Auth,
            Error::Config(_) => ErrorCategory::Invalid,
            Error::InvalidResponse(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
