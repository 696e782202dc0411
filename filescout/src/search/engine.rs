use crossbeam_channel::{unbounded, RecvTimeoutError};
use std::path::{self, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use super::processor::FileProcessor;
use crate::cancel::CancellationToken;
use crate::config::SearchOptions;
use crate::errors::{SearchError, SearchResult};
use crate::progress::{ProgressSink, SearchProgress};
use crate::results::{MatchCollector, SearchMatch};
use crate::walker::FileWalker;

/// How long a worker waits on an empty queue before re-checking for
/// cancellation or producer completion.
const WORKER_BACKOFF: Duration = Duration::from_millis(25);

/// Runs a search: enumerates files under the root on a background thread,
/// fans the paths out to a fixed worker pool, and returns the sorted match
/// list.
///
/// Enumeration and processing overlap; workers start consuming as soon as
/// the first paths are queued. The producer signals completion by closing
/// the channel, and a worker exits once the channel is both closed and
/// drained. The sink is invoked once per processed file, from the worker
/// that processed it.
///
/// Returns `Err(SearchError::InvalidRoot)` when the root precondition fails
/// and `Err(SearchError::Cancelled)` when the token fired at any point
/// before completion; a cancelled search never returns partial results.
pub fn search(
    options: &SearchOptions,
    sink: &dyn ProgressSink,
    token: &CancellationToken,
) -> SearchResult<Vec<SearchMatch>> {
    options.validate()?;
    // Enumerated paths inherit the root, and matches carry absolute paths,
    // so a relative root is made absolute here. Symlinks are not resolved.
    let root = path::absolute(&options.root_path)
        .unwrap_or_else(|_| options.root_path.clone());
    info!("Starting search under {}", root.display());

    let processor = FileProcessor::new(options, token.clone());
    let collector = MatchCollector::new();
    let processed = AtomicU64::new(0);
    let report_lock = Mutex::new(());
    let worker_count = options.effective_thread_count();
    debug!("Spawning {} search workers", worker_count);

    let (tx, rx) = unbounded::<PathBuf>();

    thread::scope(|scope| {
        let producer_token = token.clone();
        let recurse = options.recurse;
        let producer_root = root.clone();
        scope.spawn(move || {
            for path in FileWalker::new(&producer_root, recurse, producer_token) {
                // Send fails only when every worker is gone, which happens
                // on cancellation; stop producing then.
                if tx.send(path).is_err() {
                    break;
                }
            }
            // Dropping the sender marks the producer as done.
        });

        let processor = &processor;
        let collector = &collector;
        let processed = &processed;
        let report_lock = &report_lock;
        for _ in 0..worker_count {
            let rx = rx.clone();
            scope.spawn(move || loop {
                if token.is_cancelled() {
                    break;
                }
                let path = match rx.recv_timeout(WORKER_BACKOFF) {
                    Ok(path) => path,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };

                if let Some(found) = processor.process(&path) {
                    collector.push(found);
                }

                let message = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                // The increment and the report share one critical section so
                // the sink always observes a non-decreasing count.
                let _guard = report_lock.lock().unwrap_or_else(PoisonError::into_inner);
                let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                sink.report(SearchProgress {
                    total_files: 0,
                    processed_files: count,
                    message,
                });
            });
        }
        // The scope keeps only the worker clones of the receiver.
        drop(rx);
    });

    let total = processed.load(Ordering::Relaxed);
    if token.is_cancelled() {
        info!("Search cancelled after {} files", total);
        return Err(SearchError::Cancelled);
    }

    let matches = collector.into_sorted_matches();
    info!(
        "Search complete: {} matches in {} files processed",
        matches.len(),
        total
    );
    Ok(matches)
}
