//! Circuit breaker for protecting callers from a failing payload.
//!
//! The circuit breaker counts payload failures per error kind. When one kind
//! fails more often than allowed, the circuit opens and calls fail fast with
//! the last recorded error until a cooldown has elapsed; the next call is then
//! let through as a trial and decides whether the circuit closes again.
//!
//! ## States
//!
//! - **Closed**: Normal operation; calls reach the payload.
//! - **Open**: Calls fail fast, apart from trial calls after the cooldown.
//!
//! ## Retry windows
//!
//! - [`RetryWindow::Extending`]: a failed trial restarts the cooldown.
//! - [`RetryWindow::Fixed`]: a failed trial changes nothing, and an optional
//!   observer hears about each break exactly once.
//!
//! ## Usage
//!
//! ```rust
//! use simple_circuit::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
//! use simple_circuit::observers::TracingObserver;
//! use simple_circuit::payload::MockPayload;
//! use std::time::Duration;
//!
//! let config = CircuitBreakerConfig::default()
//!     .with_name("inventory")
//!     .with_max_failures(5)
//!     .with_retry_after(Duration::from_secs(30))
//!     .with_observer(TracingObserver::new());
//!
//! let protected = CircuitBreaker::new(MockPayload::new(), config);
//! assert_eq!(protected.call(|p| p.request("sku-42")).unwrap(), "sku-42");
//! ```

mod breaker;
mod config;
mod state;

pub use breaker::CircuitBreaker;
pub use config::{CircuitBreakerConfig, RetryWindow};
pub use state::{BreakerMetrics, BreakerState};
