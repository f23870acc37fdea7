//! Crawl progress reporting

/// Receives one update per collection batch
///
/// `total` is `dispatched + pending`: an estimate that grows as new links
/// are discovered, so it is not monotonic toward a fixed target.
pub trait ProgressSink: Send {
    fn update(&mut self, completed: usize, total: usize);
}

/// Logs progress through the diagnostic stream
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&mut self, completed: usize, total: usize) {
        tracing::info!("Progress: {}/{} pages", completed, total);
    }
}

/// Discards every update; used by tests and quiet sessions
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&mut self, _completed: usize, _total: usize) {}
}
