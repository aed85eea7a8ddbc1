// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry recording for resolution phases.

use std::time::Duration;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};
use tracing::Level;

#[cfg(any(feature = "metrics", test))]
use crate::telemetry::{
    attributes,
    metrics::{create_item_counter, create_phase_duration_histogram},
};
use crate::telemetry::{BatchActivity, BatchName, BatchPhase, BatchTelemetry};

#[derive(Debug)]
pub(crate) struct BatchTelemetryInner {
    logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    item_counter: Option<Counter<u64>>,
    #[cfg(any(feature = "metrics", test))]
    phase_duration: Option<Histogram<f64>>,
}

impl BatchTelemetryInner {
    pub(crate) fn new(logging_enabled: bool) -> Self {
        Self {
            logging_enabled,
            #[cfg(any(feature = "metrics", test))]
            item_counter: None,
            #[cfg(any(feature = "metrics", test))]
            phase_duration: None,
        }
    }

    #[cfg(any(feature = "metrics", test))]
    pub(crate) fn with_meter(self, meter: &Meter) -> Self {
        Self {
            item_counter: Some(create_item_counter(meter)),
            phase_duration: Some(create_phase_duration_histogram(meter)),
            ..self
        }
    }
}

impl BatchTelemetry {
    /// Records one phase of a resolution.
    ///
    /// `items` is the number of items the activity applies to; `duration` is recorded
    /// only when the phase was timed.
    pub(crate) fn record(&self, name: BatchName, phase: BatchPhase, activity: BatchActivity, items: u64, duration: Option<Duration>) {
        #[cfg(any(feature = "metrics", test))]
        {
            let attrs = [
                KeyValue::new(attributes::BATCH_NAME, name),
                KeyValue::new(attributes::BATCH_PHASE_NAME, phase.as_str()),
                KeyValue::new(attributes::BATCH_ACTIVITY_NAME, activity.as_str()),
            ];

            if let Some(counter) = &self.inner.item_counter {
                counter.add(items, &attrs);
            }

            if let (Some(d), Some(h)) = (duration, &self.inner.phase_duration) {
                h.record(d.as_secs_f64(), &attrs);
            }
        }

        if self.inner.logging_enabled {
            Self::emit(name, phase, activity, items, duration);
        }
    }

    pub(crate) fn logs_enabled(&self) -> bool {
        self.inner.logging_enabled
    }

    fn emit(name: BatchName, phase: BatchPhase, activity: BatchActivity, items: u64, duration: Option<Duration>) {
        let ph = phase.as_str();
        let act = activity.as_str();
        let duration_ns = duration.map(|d| d.as_nanos());

        // Field names must match constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    batch.name = name,
                    batch.phase = ph,
                    batch.activity = act,
                    batch.items = items,
                    batch.duration_ns = ?duration_ns,
                    "batch.event"
                )
            };
        }

        match activity.level() {
            Level::ERROR => emit_event!(error),
            Level::WARN => emit_event!(warn),
            Level::INFO => emit_event!(info),
            _ => emit_event!(debug),
        }
    }
}
