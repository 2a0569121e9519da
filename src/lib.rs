//! # Simple Circuit
//!
//! A circuit breaker that wraps a dependency, counts its failures by error
//! kind, and stops calling it for a while once it has failed too often.
//!
//! ## Overview
//!
//! Simple Circuit lets you:
//!
//! - Route every call to a dependency through one guard object
//! - Count failures per error kind rather than per message
//! - Fail fast with the last observed error while the dependency recovers
//! - Choose whether failed trial calls extend the cooldown
//! - Get notified once each time the circuit breaks
//!
//! ## Quick Start
//!
//! ```rust
//! use simple_circuit::prelude::*;
//! use simple_circuit::payload::MockPayload;
//! use std::time::Duration;
//!
//! let payload = MockPayload::new_failing(ServiceError::unavailable("geo", "503"));
//! let config = CircuitBreakerConfig::default()
//!     .with_max_failures(2)
//!     .with_retry_after(Duration::from_secs(30));
//! let breaker = CircuitBreaker::new(payload, config);
//!
//! for _ in 0..3 {
//!     let _ = breaker.call(|geo| geo.request("52.52,13.40"));
//! }
//! assert!(breaker.is_open());
//!
//! // The payload is no longer called; the cached error comes back instead.
//! let err = breaker.call(|geo| geo.request("48.85,2.35")).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Unavailable);
//! assert_eq!(breaker.inner().call_count(), 3);
//! ```
//!
//! ## Features
//!
//! - `default` - Includes tokio runtime support
//! - `tokio-runtime` - Async latency simulation in [`payload::MockPayload`]
//!   via tokio timers
//!
//! ## Architecture
//!
//! - **Core**: The `Failure` and `Observer` traits, clocks, error types
//! - **Circuit Breaker**: The state machine and its configuration
//! - **Observers**: Ready-made break observers
//! - **Payload**: A scripted payload for tests and demos

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod circuit_breaker;
pub mod core;
pub mod observers;
pub mod payload;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types at the crate root
pub use crate::core::{
    Clock, ErrorKind, Failure, ManualClock, Observer, ObserverError, ServiceError, SystemClock,
};

pub use crate::circuit_breaker::{
    BreakerMetrics, BreakerState, CircuitBreaker, CircuitBreakerConfig, RetryWindow,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use simple_circuit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::circuit_breaker::{
        BreakerMetrics, BreakerState, CircuitBreaker, CircuitBreakerConfig, RetryWindow,
    };
    pub use crate::core::{Clock, ErrorKind, Failure, Observer, ServiceError};
    pub use crate::observers::{FnObserver, TracingObserver};
}
