//! Closure-backed observer.

use crate::core::{Observer, ObserverError};

use std::fmt;

/// Adapts a closure into an [`Observer`].
///
/// ```rust
/// use simple_circuit::core::Observer;
/// use simple_circuit::observers::FnObserver;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let breaks = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&breaks);
/// let observer = FnObserver::new(move |_message: &str| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// observer.notify("circuit 'search' has been broken").unwrap();
/// assert_eq!(breaks.load(Ordering::SeqCst), 1);
/// ```
pub struct FnObserver<F> {
    callback: F,
}

impl<F> FnObserver<F>
where
    F: Fn(&str) + Send + Sync,
{
    /// Wraps `callback`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

impl<F> Observer for FnObserver<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) -> Result<(), ObserverError> {
        (self.callback)(message);
        Ok(())
    }
}
