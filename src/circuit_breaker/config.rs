//! Circuit breaker configuration.

use crate::core::{ArcObserver, Observer};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a circuit breaker.
///
/// Configuration is fixed for the lifetime of a breaker.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Name used in log events and break notifications.
    pub name: String,

    /// Number of failures of one kind the breaker tolerates; one more opens it.
    pub max_failures: u32,

    /// How long the circuit stays open before a trial call is let through.
    pub retry_after: Duration,

    /// How a failed trial affects the cooldown.
    pub window: RetryWindow,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            name: "circuit".to_string(),
            max_failures: 100,
            retry_after: Duration::from_secs(60),
            window: RetryWindow::Extending,
        }
    }
}

impl CircuitBreakerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of tolerated failures per error kind.
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Sets the cooldown.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Sets the retry window policy.
    pub fn with_window(mut self, window: RetryWindow) -> Self {
        self.window = window;
        self
    }

    /// Uses the extending window: failed trials restart the cooldown.
    pub fn extending(self) -> Self {
        self.with_window(RetryWindow::Extending)
    }

    /// Uses the fixed window without an observer.
    pub fn fixed(self) -> Self {
        self.with_window(RetryWindow::Fixed { observer: None })
    }

    /// Uses the fixed window and notifies `observer` each time the circuit breaks.
    pub fn with_observer(self, observer: impl Observer + 'static) -> Self {
        self.with_window(RetryWindow::Fixed {
            observer: Some(Arc::new(observer)),
        })
    }

    /// Creates a configuration for dependencies that should be left alone
    /// quickly once they misbehave.
    ///
    /// This configuration:
    /// - Tolerates 5 failures per kind
    /// - Keeps circuits open for 2 minutes
    /// - Extends the cooldown on every failed trial
    pub fn strict() -> Self {
        Self {
            max_failures: 5,
            retry_after: Duration::from_secs(120),
            window: RetryWindow::Extending,
            ..Self::default()
        }
    }

    /// Creates a configuration for dependencies with noisy but short outages.
    ///
    /// This configuration:
    /// - Tolerates 250 failures per kind
    /// - Keeps circuits open for 10 seconds
    /// - Never extends the cooldown
    pub fn lenient() -> Self {
        Self {
            max_failures: 250,
            retry_after: Duration::from_secs(10),
            window: RetryWindow::Fixed { observer: None },
            ..Self::default()
        }
    }
}

/// What a failed trial does to an open circuit.
#[derive(Debug, Clone)]
pub enum RetryWindow {
    /// A failed trial is counted like any other failure, restarting the
    /// cooldown from the time of the failure.
    Extending,

    /// A failed trial leaves the circuit untouched: the cooldown keeps its
    /// original deadline and nothing is counted.
    Fixed {
        /// Notified once per break, never for failed trials.
        observer: Option<ArcObserver>,
    },
}

impl RetryWindow {
    /// Returns true if failed trials restart the cooldown.
    pub fn extends_on_failed_trial(&self) -> bool {
        matches!(self, Self::Extending)
    }

    /// Returns the break observer, if any.
    pub fn observer(&self) -> Option<&ArcObserver> {
        match self {
            Self::Extending => None,
            Self::Fixed { observer } => observer.as_ref(),
        }
    }

    /// Returns the name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extending => "extending",
            Self::Fixed { .. } => "fixed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::FnObserver;

    #[test]
    fn test_default_config() {
        let config = CircuitBreakerConfig::default();
        assert_eq!(config.name, "circuit");
        assert_eq!(config.max_failures, 100);
        assert_eq!(config.retry_after, Duration::from_secs(60));
        assert!(config.window.extends_on_failed_trial());
    }

    #[test]
    fn test_config_builder() {
        let config = CircuitBreakerConfig::new()
            .with_name("payments")
            .with_max_failures(3)
            .with_retry_after(Duration::from_secs(5))
            .fixed();

        assert_eq!(config.name, "payments");
        assert_eq!(config.max_failures, 3);
        assert_eq!(config.retry_after, Duration::from_secs(5));
        assert_eq!(config.window.name(), "fixed");
        assert!(config.window.observer().is_none());
    }

    #[test]
    fn test_observer_selects_fixed_window() {
        let config = CircuitBreakerConfig::new().with_observer(FnObserver::new(|_: &str| {}));
        assert!(!config.window.extends_on_failed_trial());
        assert!(config.window.observer().is_some());

        // Switching back drops the observer along with the fixed window.
        let config = config.extending();
        assert!(config.window.observer().is_none());
    }

    #[test]
    fn test_presets() {
        let strict = CircuitBreakerConfig::strict();
        assert_eq!(strict.max_failures, 5);
        assert!(strict.window.extends_on_failed_trial());

        let lenient = CircuitBreakerConfig::lenient();
        assert_eq!(lenient.retry_after, Duration::from_secs(10));
        assert!(!lenient.window.extends_on_failed_trial());
    }
}
