//! Error types for the simple-circuit library.
//!
//! The breaker itself never wraps payload errors: whatever the payload returns
//! is handed back to the caller unchanged. The types here are a ready-made,
//! categorized payload error ([`ServiceError`]) and the error an [`Observer`]
//! may report, which the breaker logs and drops.
//!
//! [`Observer`]: crate::core::Observer

use crate::core::traits::Failure;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A categorized failure raised by a protected service.
///
/// Every variant maps to exactly one [`ErrorKind`], which is what the circuit
/// breaker counts. The message fields never participate in accounting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service is unavailable or not responding.
    #[error("service '{service}' is unavailable: {reason}")]
    Unavailable {
        /// Name of the service.
        service: String,
        /// Human-readable reason for unavailability.
        reason: String,
    },

    /// The call timed out.
    #[error("call to service '{service}' timed out after {elapsed:?}")]
    Timeout {
        /// Name of the service.
        service: String,
        /// How long the call ran before timing out.
        elapsed: Duration,
    },

    /// Failed to connect to the service.
    #[error("connection to service '{service}' failed: {message}")]
    ConnectionFailed {
        /// Name of the service.
        service: String,
        /// Error message describing the failure.
        message: String,
    },

    /// The service refused the call because of rate limiting.
    #[error("rate limit exceeded for service '{service}': retry after {retry_after:?}")]
    RateLimited {
        /// Name of the service.
        service: String,
        /// Suggested wait time before retry.
        retry_after: Option<Duration>,
    },

    /// The service answered with something the caller could not use.
    #[error("bad response from service '{service}': {details}")]
    BadResponse {
        /// Name of the service.
        service: String,
        /// Details about what was wrong.
        details: String,
    },

    /// An internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl ServiceError {
    /// Returns the service name if this error is associated with one.
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Unavailable { service, .. }
            | Self::Timeout { service, .. }
            | Self::ConnectionFailed { service, .. }
            | Self::RateLimited { service, .. }
            | Self::BadResponse { service, .. } => Some(service),
            Self::Internal { .. } => None,
        }
    }

    /// Creates an `Unavailable` error.
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Timeout` error.
    pub fn timeout(service: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            service: service.into(),
            elapsed,
        }
    }

    /// Creates a `ConnectionFailed` error.
    pub fn connection_failed(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a `BadResponse` error.
    pub fn bad_response(service: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadResponse {
            service: service.into(),
            details: details.into(),
        }
    }

    /// Creates an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// The category of a [`ServiceError`], used as the failure-accounting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ServiceError::Unavailable`].
    Unavailable,
    /// See [`ServiceError::Timeout`].
    Timeout,
    /// See [`ServiceError::ConnectionFailed`].
    ConnectionFailed,
    /// See [`ServiceError::RateLimited`].
    RateLimited,
    /// See [`ServiceError::BadResponse`].
    BadResponse,
    /// See [`ServiceError::Internal`].
    Internal,
}

impl ErrorKind {
    /// Returns a stable, lowercase name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::ConnectionFailed => "connection_failed",
            Self::RateLimited => "rate_limited",
            Self::BadResponse => "bad_response",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Failure for ServiceError {
    type Kind = ErrorKind;

    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::BadResponse { .. } => ErrorKind::BadResponse,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Error reported by an [`Observer`](crate::core::Observer).
///
/// The breaker never propagates this to its callers.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The observer could not deliver the notification.
    #[error("notification could not be delivered: {reason}")]
    DeliveryFailed {
        /// Why delivery failed.
        reason: String,
    },
}

impl ObserverError {
    /// Creates a `DeliveryFailed` error.
    pub fn delivery_failed(reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            reason: reason.into(),
        }
    }
}
