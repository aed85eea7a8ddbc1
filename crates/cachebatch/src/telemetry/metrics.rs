// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use opentelemetry::{
    InstrumentationScope,
    metrics::{Counter, Histogram, Meter, MeterProvider},
};

const METER_NAME: &str = "cachebatch";
const VERSION: &str = "v0.1.0";
const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.47.0";
const BATCH_ITEM_COUNT_NAME: &str = "batch.item.count";
const BATCH_PHASE_DURATION_NAME: &str = "batch.phase.duration";

pub(crate) fn create_meter(meter_provider: &dyn MeterProvider) -> Meter {
    meter_provider.meter_with_scope(
        InstrumentationScope::builder(METER_NAME)
            .with_version(VERSION)
            .with_schema_url(SCHEMA_URL)
            .build(),
    )
}

pub(crate) fn create_item_counter(meter: &Meter) -> Counter<u64> {
    meter
        .u64_counter(BATCH_ITEM_COUNT_NAME)
        .with_description("Batch items by phase and activity")
        .with_unit("{item}")
        .build()
}

pub(crate) fn create_phase_duration_histogram(meter: &Meter) -> Histogram<f64> {
    meter
        .f64_histogram(BATCH_PHASE_DURATION_NAME)
        .with_description("Batch resolution phase duration")
        .with_unit("s")
        .build()
}
