// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extension traits for telemetry recording.

use std::time::Duration;

use tick::Clock;

use crate::telemetry::{BatchActivity, BatchName, BatchPhase, BatchTelemetry};

/// Result of a timed async operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimedResult<R> {
    pub result: R,
    pub duration: Duration,
}

pub(crate) trait ClockExt {
    /// Times an async operation and returns both the result and elapsed duration.
    fn timed_async<F, R>(&self, f: F) -> impl Future<Output = TimedResult<R>>
    where
        F: Future<Output = R>;
}

impl ClockExt for Clock {
    async fn timed_async<F, R>(&self, f: F) -> TimedResult<R>
    where
        F: Future<Output = R>,
    {
        let stopwatch = self.stopwatch();
        let result = f.await;
        TimedResult {
            result,
            duration: stopwatch.elapsed(),
        }
    }
}

pub(crate) trait BatchTelemetryExt {
    /// Records a timed phase if telemetry is enabled.
    fn record(&self, name: BatchName, phase: BatchPhase, activity: BatchActivity, items: usize, duration: Duration);

    /// Records an untimed activity if telemetry is enabled.
    fn record_count(&self, name: BatchName, phase: BatchPhase, activity: BatchActivity, items: usize);

    /// Returns `true` if per-key debug logging is enabled.
    fn logs_enabled(&self) -> bool;
}

impl BatchTelemetryExt for Option<BatchTelemetry> {
    fn record(&self, name: BatchName, phase: BatchPhase, activity: BatchActivity, items: usize, duration: Duration) {
        if let Some(t) = self {
            t.record(name, phase, activity, items as u64, Some(duration));
        }
    }

    fn record_count(&self, name: BatchName, phase: BatchPhase, activity: BatchActivity, items: usize) {
        if let Some(t) = self {
            t.record(name, phase, activity, items as u64, None);
        }
    }

    fn logs_enabled(&self) -> bool {
        self.as_ref().is_some_and(BatchTelemetry::logs_enabled)
    }
}
