//! Observer that logs break notifications.

use crate::core::{Observer, ObserverError};

/// Emits every break notification as a `WARN` tracing event.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    component: Option<String>,
}

impl TracingObserver {
    /// Creates an observer that logs without an extra label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `component` field to every event.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

impl Observer for TracingObserver {
    fn notify(&self, message: &str) -> Result<(), ObserverError> {
        match &self.component {
            Some(component) => tracing::warn!(component = %component, "{message}"),
            None => tracing::warn!("{message}"),
        }
        Ok(())
    }
}
