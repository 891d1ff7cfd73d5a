//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives fractional progress, at least once per stage or file.
pub trait ProgressSink {
    /// Reports progress: `fraction` in `0..=1` plus a short message.
    fn report(&self, fraction: f64, message: &str);
}

/// A sink that discards all progress reports.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _fraction: f64, _message: &str) {}
}

/// Shared cancellation flag for a running session.
///
/// Cancellation is cooperative: sessions check the flag before issuing
/// each producer request and stop without error when it is set. An
/// in-flight request is never aborted — its result is simply discarded,
/// never applied to state.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_starts_unset_and_latches() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let flag = CancelFlag::new();
        let observer = flag.clone();
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
