// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const BATCH_NAME: &str = "batch.name";

#[cfg(any(feature = "metrics", test))]
pub(crate) const BATCH_PHASE_NAME: &str = "batch.phase";

#[cfg(any(feature = "metrics", test))]
pub(crate) const BATCH_ACTIVITY_NAME: &str = "batch.activity";

#[cfg(test)]
pub(crate) const BATCH_ITEMS_NAME: &str = "batch.items";

#[cfg(test)]
pub(crate) const BATCH_DURATION_NAME: &str = "batch.duration_ns";

#[cfg(test)]
pub(crate) const BATCH_EVENT_NAME: &str = "batch.event";
