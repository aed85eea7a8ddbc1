// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Batch resolution telemetry.
//!
//! Each resolution phase is recorded as an activity with an item count and a duration.
//! Structured logs go through `tracing`; with the `metrics` feature, OpenTelemetry
//! instruments are recorded as well.

use std::sync::Arc;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::{Meter, MeterProvider};
use tracing::Level;

use crate::telemetry::batch::BatchTelemetryInner;

pub(crate) mod attributes;
pub(crate) mod batch;
pub(crate) mod ext;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

/// Static name identifying a resolver in logs and metrics.
pub type BatchName = &'static str;

/// Telemetry collector for batch resolution.
///
/// Construct one through [`TelemetryConfig`] and pass it to the resolver builder via
/// `.telemetry()`. Cloning is cheap and clones share instruments.
#[derive(Clone, Debug)]
pub struct BatchTelemetry {
    inner: Arc<BatchTelemetryInner>,
}

/// Configuration for batch telemetry.
///
/// # Examples
///
/// ```
/// use cachebatch::TelemetryConfig;
///
/// let telemetry = TelemetryConfig::new().with_logs().build();
/// # let _ = telemetry;
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelemetryConfig {
    logs_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<Meter>,
}

impl TelemetryConfig {
    /// Creates a new telemetry configuration with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables structured logging of resolution phases through `tracing`.
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Enables metrics collection using the provided meter provider.
    #[cfg(any(feature = "metrics", test))]
    #[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.meter = Some(metrics::create_meter(provider));
        self
    }

    /// Builds the telemetry collector from this configuration.
    #[must_use]
    pub fn build(self) -> BatchTelemetry {
        let inner = BatchTelemetryInner::new(self.logs_enabled);

        #[cfg(any(feature = "metrics", test))]
        let inner = match &self.meter {
            Some(meter) => inner.with_meter(meter),
            None => inner,
        };

        BatchTelemetry { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchPhase {
    Lookup,
    Load,
    Writeback,
    Resolve,
}

impl BatchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "batch.lookup",
            Self::Load => "batch.load",
            Self::Writeback => "batch.writeback",
            Self::Resolve => "batch.resolve",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchActivity {
    Hit,
    Miss,
    Loaded,
    Written,
    Degraded,
    Ok,
    Error,
}

impl BatchActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "batch.hit",
            Self::Miss => "batch.miss",
            Self::Loaded => "batch.loaded",
            Self::Written => "batch.written",
            Self::Degraded => "batch.degraded",
            Self::Ok => "batch.ok",
            Self::Error => "batch.error",
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Hit | Self::Miss | Self::Ok => Level::DEBUG,
            Self::Loaded | Self::Written => Level::INFO,
            Self::Degraded => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}
