//! Ready-made break observers.
//!
//! Use [`TracingObserver`] to turn break notifications into log events, or
//! [`FnObserver`] to hand them to a closure (alerting, counters, tests).
//! Anything else can implement [`Observer`](crate::core::Observer) directly.

mod func;
mod log;

pub use func::FnObserver;
pub use log::TracingObserver;
