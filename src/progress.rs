use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A status update emitted while a propagation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent<'a> {
    /// Human-readable phase name.
    pub phase: &'a str,
    /// Completion in `[0, 1]`, when the phase can estimate it.
    pub fraction: Option<f64>,
}

/// Receives progress events. Purely observational.
///
/// Implemented for every `Fn(&ProgressEvent)` closure.
pub trait ProgressObserver: Send + Sync {
    /// Called at well-defined points: phase starts and, during geodesic
    /// propagation, once per raster pass.
    fn on_progress(&self, event: &ProgressEvent<'_>);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent<'_>) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        self(event);
    }
}

/// Optional observer plus cooperative cancellation flag, shared by the
/// transforms and the estimator.
#[derive(Clone, Default)]
pub struct Monitor {
    observer: Option<Arc<dyn ProgressObserver>>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Monitor {
    /// Creates a monitor that observes nothing and never cancels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attaches a cancellation flag. Setting it to `true` stops geodesic
    /// propagation at the next pass boundary.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Emits an event to the observer, if any.
    pub fn notify(&self, phase: &str, fraction: Option<f64>) {
        if let Some(observer) = &self.observer {
            observer.on_progress(&ProgressEvent { phase, fraction });
        }
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("observer", &self.observer.is_some())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
