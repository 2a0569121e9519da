//! Circuit breaker state machine.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The current state of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakerState {
    /// Circuit is closed; calls pass through to the payload.
    #[default]
    Closed,

    /// Circuit is open; calls fail fast until the cooldown has elapsed.
    Open {
        /// When the circuit last broke (or, with an extending window, when the
        /// last trial failed).
        broken_at: Instant,
    },
}

impl BreakerState {
    /// Returns `true` if the circuit is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if the circuit is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Returns when the circuit broke, if it is open.
    pub fn broken_at(&self) -> Option<Instant> {
        match self {
            Self::Closed => None,
            Self::Open { broken_at } => Some(*broken_at),
        }
    }

    /// Returns the instant from which a trial call is allowed, if open.
    ///
    /// `None` is also returned when the deadline does not fit in an `Instant`;
    /// such a circuit never admits a trial.
    pub fn retry_at(&self, retry_after: Duration) -> Option<Instant> {
        self.broken_at()
            .and_then(|broken_at| broken_at.checked_add(retry_after))
    }

    /// Returns `true` if the circuit is open and `now` is still before the
    /// end of the cooldown.
    pub fn is_cooling_down(&self, retry_after: Duration, now: Instant) -> bool {
        match self {
            Self::Closed => false,
            Self::Open { .. } => match self.retry_at(retry_after) {
                Some(deadline) => now < deadline,
                None => true,
            },
        }
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open { .. } => "open",
        }
    }
}

/// Metrics about circuit breaker behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakerMetrics {
    /// Total number of calls, including rejected ones.
    pub total_calls: u64,
    /// Number of calls where the payload succeeded.
    pub successful_calls: u64,
    /// Number of calls where the payload failed.
    pub failed_calls: u64,
    /// Number of calls rejected without reaching the payload.
    pub rejected_calls: u64,
    /// Number of times the circuit has opened.
    pub times_opened: u64,
    /// Number of times the circuit has closed after a successful trial.
    pub times_closed: u64,
}

impl BreakerMetrics {
    /// Creates new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 1.0;
        }
        self.successful_calls as f64 / self.total_calls as f64
    }

    /// Returns the failure rate (0.0 to 1.0), counting rejected calls as failures.
    pub fn failure_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        (self.failed_calls + self.rejected_calls) as f64 / self.total_calls as f64
    }
}

/// Lock-free counters behind [`BreakerMetrics`].
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    successful_calls: AtomicU64,
    failed_calls: AtomicU64,
    rejected_calls: AtomicU64,
    times_opened: AtomicU64,
    times_closed: AtomicU64,
}

impl MetricsRecorder {
    pub(crate) fn record_success(&self) {
        self.successful_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_opened(&self) {
        self.times_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_closed(&self) {
        self.times_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> BreakerMetrics {
        let successful_calls = self.successful_calls.load(Ordering::Relaxed);
        let failed_calls = self.failed_calls.load(Ordering::Relaxed);
        let rejected_calls = self.rejected_calls.load(Ordering::Relaxed);
        BreakerMetrics {
            total_calls: successful_calls + failed_calls + rejected_calls,
            successful_calls,
            failed_calls,
            rejected_calls,
            times_opened: self.times_opened.load(Ordering::Relaxed),
            times_closed: self.times_closed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaker_state_default() {
        let state = BreakerState::default();
        assert!(state.is_closed());
        assert!(!state.is_open());
        assert_eq!(state.broken_at(), None);
    }

    #[test]
    fn test_breaker_state_names() {
        assert_eq!(BreakerState::Closed.name(), "closed");
        assert_eq!(
            BreakerState::Open {
                broken_at: Instant::now(),
            }
            .name(),
            "open"
        );
    }

    #[test]
    fn test_cooldown_boundary() {
        let broken_at = Instant::now();
        let state = BreakerState::Open { broken_at };
        let retry_after = Duration::from_secs(1);

        assert!(state.is_cooling_down(retry_after, broken_at));
        assert!(state.is_cooling_down(retry_after, broken_at + Duration::from_millis(999)));
        assert!(!state.is_cooling_down(retry_after, broken_at + retry_after));
        assert_eq!(state.retry_at(retry_after), Some(broken_at + retry_after));

        assert!(!BreakerState::Closed.is_cooling_down(retry_after, broken_at));
    }

    #[test]
    fn test_unrepresentable_deadline_keeps_cooling_down() {
        let state = BreakerState::Open {
            broken_at: Instant::now(),
        };
        assert_eq!(state.retry_at(Duration::MAX), None);
        assert!(state.is_cooling_down(Duration::MAX, Instant::now()));
    }

    #[test]
    fn test_metrics() {
        let recorder = MetricsRecorder::default();
        assert_eq!(recorder.snapshot().success_rate(), 1.0);
        assert_eq!(recorder.snapshot().failure_rate(), 0.0);

        recorder.record_success();
        recorder.record_success();
        recorder.record_failure();
        recorder.record_rejected();
        recorder.record_opened();

        let metrics = recorder.snapshot();
        assert_eq!(metrics.total_calls, 4);
        assert_eq!(metrics.successful_calls, 2);
        assert_eq!(metrics.failed_calls, 1);
        assert_eq!(metrics.rejected_calls, 1);
        assert_eq!(metrics.times_opened, 1);
        assert!((metrics.success_rate() - 0.5).abs() < f64::EPSILON);
        assert!((metrics.failure_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = BreakerMetrics {
            total_calls: 3,
            rejected_calls: 1,
            ..BreakerMetrics::new()
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_calls"], 3);
        assert_eq!(json["rejected_calls"], 1);
    }
}
