//! Progress reporting
//!
//! The coordinator describes what it is doing as human-readable lines. These
//! lines are an observability hook for the caller, separate from logging and
//! from the scraped data.

/// Receives progress lines from the coordinator
pub trait ProgressSink {
    fn on_progress(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str),
{
    fn on_progress(&self, message: &str) {
        self(message)
    }
}

/// Forwards progress lines to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Discards progress lines
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _message: &str) {}
}
