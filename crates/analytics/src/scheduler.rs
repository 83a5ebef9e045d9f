use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use medsupply_core::{Clock, FixedClock, SharedClock, SystemClock};

use crate::job::AnalyticsJob;

/// Scheduler/executor for analytics jobs.
///
/// Reads the clock exactly once per job, so every field of one result agrees
/// on "now".
pub trait AnalyticsScheduler: Send + Sync {
    fn clock(&self) -> &dyn Clock;

    fn run<J: AnalyticsJob>(&self, job: J) -> J::Output {
        let now = self.clock().now();
        debug!(
            model = job.model(),
            inputs = job.input_len(),
            at = %now,
            "running analytics job"
        );
        job.run(now)
    }
}

/// Simple synchronous scheduler that runs jobs immediately in-process.
#[derive(Debug, Clone)]
pub struct LocalAnalyticsScheduler {
    clock: SharedClock,
}

impl LocalAnalyticsScheduler {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Scheduler backed by the system wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Scheduler whose clock never moves (tests, reproducible reports).
    pub fn frozen_at(instant: DateTime<Utc>) -> Self {
        Self::new(Arc::new(FixedClock::new(instant)))
    }
}

impl Default for LocalAnalyticsScheduler {
    fn default() -> Self {
        Self::system()
    }
}

impl AnalyticsScheduler for LocalAnalyticsScheduler {
    fn clock(&self) -> &dyn Clock {
        &*self.clock
    }
}
