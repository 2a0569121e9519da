//! Payload test doubles.
//!
//! A circuit breaker can wrap any value; nothing in this module is required to
//! use one. [`MockPayload`] is a scripted stand-in for a flaky dependency,
//! useful in tests and demos.

mod mock;

pub use mock::{MockPayload, MockResponse};
