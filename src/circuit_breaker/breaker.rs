//! Circuit breaker implementation.

use crate::circuit_breaker::config::CircuitBreakerConfig;
use crate::circuit_breaker::state::{BreakerMetrics, BreakerState, MetricsRecorder};
use crate::core::{Clock, Failure, SystemClock};

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// A circuit breaker wrapped around a payload.
///
/// Every call to the payload goes through [`call`](Self::call) (or
/// [`call_async`](Self::call_async)). Failures are counted per error kind;
/// once one kind has failed more than `max_failures` times, the circuit opens
/// and calls fail fast with the last recorded error, without touching the
/// payload, until `retry_after` has elapsed. The first call after that is a
/// trial: if it succeeds the circuit closes and all counts reset.
///
/// # States
///
/// - **Closed**: Normal operation. Calls pass through, failures are counted.
/// - **Open**: Calls are rejected with the cached error until the cooldown
///   has elapsed, then let through as trials.
///
/// What a failed trial does depends on the [`RetryWindow`]: the extending
/// window counts it and restarts the cooldown, the fixed window leaves the
/// circuit exactly as it was.
///
/// # Example
///
/// ```rust
/// use simple_circuit::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
/// use simple_circuit::core::ServiceError;
/// use simple_circuit::payload::MockPayload;
///
/// let payload = MockPayload::new_failing(ServiceError::unavailable("mock", "down"));
/// let config = CircuitBreakerConfig::default().with_max_failures(1);
/// let breaker = CircuitBreaker::new(payload, config);
///
/// assert!(breaker.call(|p| p.request("a")).is_err());
/// assert!(breaker.call(|p| p.request("b")).is_err());
/// assert!(breaker.is_open());
///
/// // Fails fast: the payload is not called a third time.
/// assert!(breaker.call(|p| p.request("c")).is_err());
/// assert_eq!(breaker.inner().call_count(), 2);
/// ```
///
/// [`RetryWindow`]: crate::circuit_breaker::RetryWindow
pub struct CircuitBreaker<P, E: Failure, C: Clock = SystemClock> {
    /// The wrapped payload.
    inner: P,
    /// State, failure counts and the cached error.
    ledger: RwLock<Ledger<E>>,
    /// Configuration.
    config: CircuitBreakerConfig,
    /// Time source for cooldowns.
    clock: C,
    /// Metrics.
    metrics: MetricsRecorder,
}

/// Everything that must change together under the breaker lock.
struct Ledger<E: Failure> {
    state: BreakerState,
    failures: HashMap<E::Kind, u32>,
    last_error: Option<E>,
}

impl<E: Failure> Ledger<E> {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            failures: HashMap::new(),
            last_error: None,
        }
    }
}

/// Result of the failure bookkeeping, acted upon once the lock is released.
enum Accounting<K> {
    /// Counted; still below the threshold.
    Counted,
    /// Closed circuit crossed the threshold.
    Broke { kind: K, failures: u32 },
    /// Open circuit crossed it again: the cooldown restarts.
    Extended { kind: K, failures: u32 },
    /// Failed trial on a fixed window: nothing recorded.
    Ignored,
}

impl<P, E: Failure> CircuitBreaker<P, E, SystemClock> {
    /// Creates a new circuit breaker with the given payload and configuration.
    pub fn new(payload: P, config: CircuitBreakerConfig) -> Self {
        Self::with_clock(payload, config, SystemClock)
    }

    /// Creates a new circuit breaker with default configuration.
    pub fn with_defaults(payload: P) -> Self {
        Self::new(payload, CircuitBreakerConfig::default())
    }
}

impl<P, E: Failure, C: Clock> CircuitBreaker<P, E, C> {
    /// Creates a new circuit breaker that reads time from `clock`.
    pub fn with_clock(payload: P, config: CircuitBreakerConfig, clock: C) -> Self {
        Self {
            inner: payload,
            ledger: RwLock::new(Ledger::new()),
            config,
            clock,
            metrics: MetricsRecorder::default(),
        }
    }

    /// Calls `operation` on the payload, unless the circuit is cooling down.
    ///
    /// Returns the payload's own result. While the circuit is open and the
    /// cooldown has not elapsed, returns the last recorded error instead and
    /// does not run `operation`.
    pub fn call<T, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&P) -> Result<T, E>,
    {
        self.admit()?;

        match operation(&self.inner) {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Async version of [`call`](Self::call).
    ///
    /// No lock is held while the returned future is polled, so concurrent
    /// calls reach the payload in parallel.
    pub async fn call_async<'a, T, F, Fut>(&'a self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&'a P) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit()?;

        match operation(&self.inner).await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Returns the current state of the circuit breaker.
    pub fn state(&self) -> BreakerState {
        self.read_ledger().state
    }

    /// Returns `true` if the circuit is open.
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Returns `true` if the circuit is closed.
    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// Returns the number of failures of `kind` since the circuit last closed.
    pub fn failure_count(&self, kind: &E::Kind) -> u32 {
        self.read_ledger().failures.get(kind).copied().unwrap_or(0)
    }

    /// Returns the last recorded failure since the circuit last closed, if any.
    pub fn last_error(&self) -> Option<E> {
        self.read_ledger().last_error.clone()
    }

    /// Returns the instant from which a trial call is let through, if open.
    pub fn retry_at(&self) -> Option<Instant> {
        self.state().retry_at(self.config.retry_after)
    }

    /// Returns a copy of the current metrics.
    pub fn metrics(&self) -> BreakerMetrics {
        self.metrics.snapshot()
    }

    /// Returns a reference to the wrapped payload.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Returns the name of this breaker.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Decides whether a call may reach the payload.
    fn admit(&self) -> Result<(), E> {
        let ledger = self.read_ledger();
        let BreakerState::Open { .. } = ledger.state else {
            return Ok(());
        };

        if ledger
            .state
            .is_cooling_down(self.config.retry_after, self.clock.now())
        {
            // An open circuit always has a cached error.
            if let Some(error) = &ledger.last_error {
                self.metrics.record_rejected();
                tracing::debug!(circuit = %self.config.name, "circuit open, failing fast");
                return Err(error.clone());
            }
        }

        tracing::debug!(circuit = %self.config.name, "cooldown elapsed, letting trial call through");
        Ok(())
    }

    /// Records a successful call.
    fn record_success(&self) {
        self.metrics.record_success();
        if self.read_ledger().state.is_closed() {
            return;
        }

        let mut ledger = self.write_ledger();
        if ledger.state.is_closed() {
            return;
        }
        ledger.state = BreakerState::Closed;
        ledger.failures.clear();
        ledger.last_error = None;
        drop(ledger);

        self.metrics.record_closed();
        tracing::info!(circuit = %self.config.name, "trial call succeeded, circuit closed");
    }

    /// Records a failed call.
    fn record_failure(&self, error: &E) {
        self.metrics.record_failure();

        match self.account(error) {
            Accounting::Counted => {}
            Accounting::Ignored => {
                tracing::debug!(
                    circuit = %self.config.name,
                    "trial call failed, cooldown unchanged"
                );
            }
            Accounting::Extended { kind, failures } => {
                tracing::debug!(
                    circuit = %self.config.name,
                    kind = ?kind,
                    failures,
                    "trial call failed, cooldown restarted"
                );
            }
            Accounting::Broke { kind, failures } => {
                self.metrics.record_opened();
                tracing::warn!(
                    circuit = %self.config.name,
                    kind = ?kind,
                    failures,
                    max_failures = self.config.max_failures,
                    retry_after = ?self.config.retry_after,
                    "circuit broken"
                );
                self.notify_observer(&kind);
            }
        }
    }

    /// Counts `error` and opens the circuit if its kind crossed the threshold.
    fn account(&self, error: &E) -> Accounting<E::Kind> {
        let mut ledger = self.write_ledger();
        let was_open = ledger.state.is_open();
        if was_open && !self.config.window.extends_on_failed_trial() {
            return Accounting::Ignored;
        }

        let kind = error.kind();
        ledger.last_error = Some(error.clone());
        let count = ledger.failures.entry(kind.clone()).or_insert(0);
        *count = count.saturating_add(1);
        let failures = *count;

        if failures <= self.config.max_failures {
            return Accounting::Counted;
        }

        ledger.state = BreakerState::Open {
            broken_at: self.clock.now(),
        };
        if was_open {
            Accounting::Extended { kind, failures }
        } else {
            Accounting::Broke { kind, failures }
        }
    }

    /// Tells the observer, if any, that the circuit broke.
    fn notify_observer(&self, kind: &E::Kind) {
        let Some(observer) = self.config.window.observer() else {
            return;
        };

        let message = format!(
            "{} has been broken: more than {} failures of kind {:?}",
            self.config.name, self.config.max_failures, kind
        );
        match panic::catch_unwind(AssertUnwindSafe(|| observer.notify(&message))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(
                    circuit = %self.config.name,
                    error = %e,
                    "break observer failed"
                );
            }
            Err(_) => {
                tracing::warn!(circuit = %self.config.name, "break observer panicked");
            }
        }
    }

    fn read_ledger(&self) -> RwLockReadGuard<'_, Ledger<E>> {
        self.ledger
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_ledger(&self) -> RwLockWriteGuard<'_, Ledger<E>> {
        self.ledger
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P, E, C> fmt::Debug for CircuitBreaker<P, E, C>
where
    P: fmt::Debug,
    E: Failure + fmt::Debug,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.read_ledger();
        f.debug_struct("CircuitBreaker")
            .field("inner", &self.inner)
            .field("state", &ledger.state)
            .field("failures", &ledger.failures)
            .field("last_error", &ledger.last_error)
            .field("config", &self.config)
            .finish()
    }
}
