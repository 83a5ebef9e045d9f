use chrono::{DateTime, Utc};

/// A single analytics computation over caller-provided input.
///
/// Jobs are storage-agnostic: inputs are owned by the job, supplied by callers
/// (fixtures, dashboards, services). The instant is injected by the scheduler
/// so a job never reads the wall clock itself.
pub trait AnalyticsJob: Send + Sync {
    type Output: Send;

    /// Model label, used for logging and echoed into results.
    fn model(&self) -> &'static str;

    /// Number of input records (history length, snapshot count), for logging.
    fn input_len(&self) -> usize;

    /// Execute the computation as of `now`.
    ///
    /// Must not fail: degenerate input produces default figures.
    fn run(&self, now: DateTime<Utc>) -> Self::Output;
}
