//! Core types and traits for the simple-circuit library.
//!
//! - [`traits`] - The `Failure` and `Observer` traits
//! - [`error`] - Structured error types
//! - [`clock`] - Monotonic time source abstraction

pub mod clock;
pub mod error;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, ObserverError, ServiceError};
pub use traits::{ArcObserver, Failure, Observer};
