//! Core traits for the simple-circuit library.
//!
//! [`Failure`] is how a payload error tells the breaker which category it
//! belongs to; [`Observer`] is the hook the fixed-window breaker notifies when
//! it breaks.

use crate::core::error::ObserverError;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// An error that can be counted by a circuit breaker.
///
/// Failures are counted per [`Failure::Kind`], never per message, so two
/// timeouts with different text land in the same bucket. The error is cloned
/// when the breaker caches it for fast-fail.
///
/// # Example Implementation
///
/// ```rust
/// use simple_circuit::core::Failure;
///
/// #[derive(Debug, Clone)]
/// enum DbError {
///     Deadlock,
///     Disconnected(String),
/// }
///
/// impl Failure for DbError {
///     type Kind = &'static str;
///
///     fn kind(&self) -> &'static str {
///         match self {
///             DbError::Deadlock => "deadlock",
///             DbError::Disconnected(_) => "disconnected",
///         }
///     }
/// }
/// ```
pub trait Failure: Clone + Send + Sync {
    /// The category discriminator used as the accounting key.
    type Kind: Eq + Hash + Clone + Debug + Send + Sync;

    /// Returns the category of this failure.
    fn kind(&self) -> Self::Kind;
}

/// Receives a notification when a fixed-window breaker breaks.
///
/// `notify` runs synchronously on the thread whose call tripped the breaker,
/// after the breaker's internal lock has been released. Whatever the observer
/// does (an `Err` or even a panic) is logged and discarded; the caller still
/// gets the payload error that caused the trip.
pub trait Observer: Send + Sync + Debug {
    /// Handles a break notification.
    fn notify(&self, message: &str) -> Result<(), ObserverError>;
}

/// An arc-wrapped observer for shared ownership.
pub type ArcObserver = Arc<dyn Observer>;
