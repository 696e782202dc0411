use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation signal checked cooperatively by the search pipeline.
///
/// The caller keeps one clone and passes another into the search. The flag is
/// polled at safe points (queue dequeue, per directory visited, per line
/// scanned), never via thread interruption. Loads use `Relaxed` ordering --
/// the worst case is one extra file or directory processed before the
/// cancellation is observed.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. Idempotent: repeated calls are harmless.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
