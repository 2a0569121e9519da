//! Mock payload for testing.
//!
//! This module provides a scriptable payload that can be used in tests to
//! simulate a dependency that fails, recovers, or alternates between error
//! kinds, without a real service behind it.

use crate::core::ServiceError;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What a [`MockPayload`] does for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Return the request input unchanged.
    Echo,
    /// Return a fixed reply.
    Reply(String),
    /// Fail with the given error.
    Fail(ServiceError),
}

/// A mock payload for testing purposes.
///
/// Each request consumes the next scripted response; once the script is
/// exhausted, the default response is used. Every request, successful or
/// not, is counted, which makes it easy to assert that an open circuit did
/// not reach the payload.
///
/// # Examples
///
/// ```rust
/// use simple_circuit::core::ServiceError;
/// use simple_circuit::payload::{MockPayload, MockResponse};
///
/// // Echoes every request
/// let payload = MockPayload::new();
/// assert_eq!(payload.request("ping").unwrap(), "ping");
///
/// // Fails twice, then recovers
/// let error = ServiceError::unavailable("mock", "warming up");
/// let payload = MockPayload::new()
///     .then(MockResponse::Fail(error.clone()))
///     .then(MockResponse::Fail(error))
///     .then(MockResponse::Reply("ready".into()));
/// assert!(payload.request("a").is_err());
/// assert!(payload.request("b").is_err());
/// assert_eq!(payload.request("c").unwrap(), "ready");
/// assert_eq!(payload.call_count(), 3);
/// ```
#[derive(Debug)]
pub struct MockPayload {
    /// Name of this payload instance.
    name: String,
    /// Responses consumed in order.
    script: Mutex<VecDeque<MockResponse>>,
    /// Response used once the script is exhausted.
    default_response: MockResponse,
    /// Simulated latency for requests.
    latency: Option<Duration>,
    /// Counter for requests.
    call_count: AtomicU64,
}

impl MockPayload {
    /// Creates a mock payload that echoes every request.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            script: Mutex::new(VecDeque::new()),
            default_response: MockResponse::Echo,
            latency: None,
            call_count: AtomicU64::new(0),
        }
    }

    /// Creates a mock payload that always fails with `error`.
    pub fn new_failing(error: ServiceError) -> Self {
        Self {
            default_response: MockResponse::Fail(error),
            ..Self::new()
        }
    }

    /// Sets the name of this payload.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the response used once the script is exhausted.
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Appends a scripted response.
    pub fn then(self, response: MockResponse) -> Self {
        self.push(response);
        self
    }

    /// Appends scripted responses.
    pub fn with_script(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.lock_script().extend(responses);
        self
    }

    /// Sets the simulated latency for requests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Appends a scripted response (shared-reference version).
    pub fn push(&self, response: MockResponse) {
        self.lock_script().push_back(response);
    }

    /// Returns the name of this payload.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of requests received.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handles a request synchronously.
    pub fn request(&self, input: &str) -> Result<String, ServiceError> {
        let response = self.next_response();
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        Self::respond(response, input)
    }

    /// Handles a request asynchronously.
    pub async fn request_async(&self, input: &str) -> Result<String, ServiceError> {
        let response = self.next_response();
        if let Some(latency) = self.latency {
            #[cfg(feature = "tokio-runtime")]
            tokio::time::sleep(latency).await;
            #[cfg(not(feature = "tokio-runtime"))]
            std::thread::sleep(latency);
        }
        Self::respond(response, input)
    }

    fn next_response(&self) -> MockResponse {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.lock_script()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone())
    }

    fn respond(response: MockResponse, input: &str) -> Result<String, ServiceError> {
        match response {
            MockResponse::Echo => Ok(input.to_string()),
            MockResponse::Reply(reply) => Ok(reply),
            MockResponse::Fail(error) => Err(error),
        }
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<MockResponse>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockPayload {
    fn default() -> Self {
        Self::new()
    }
}
