/// A snapshot of search progress, delivered once per processed file.
///
/// Each value is ephemeral: the sink receives it, renders it, and drops it.
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Total files known up front. Always 0: counting the tree first would
    /// double the I/O cost, so the total is never pre-computed.
    pub total_files: u64,
    /// Running count of files pulled off the queue and processed, whether or
    /// not they matched.
    pub processed_files: u64,
    /// Short status text, the name of the file just processed.
    pub message: String,
}

/// Receives progress snapshots from the worker pool.
///
/// Invoked synchronously by whichever worker processed the file, so
/// implementations must be cheap or do their own buffering/throttling.
pub trait ProgressSink: Sync {
    fn report(&self, progress: SearchProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(SearchProgress) + Sync,
{
    fn report(&self, progress: SearchProgress) {
        self(progress)
    }
}
