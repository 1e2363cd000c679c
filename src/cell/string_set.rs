//! String-set cell: a bounded, grow-only set of strings.

use crate::aggregate::StringSetData;
use crate::cell::{MetricCell, MetricSnapshot, MetricUpdate, StartTime};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Result;
use crate::core::types::{ContextId, MetricKind, MetricName};
use crate::export::{MetricPayload, MonitoringRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks the set of strings observed for one metric.
///
/// Reaching the byte capacity is logged as a warning, not an error;
/// subsequent adds become no-ops while everything accumulated before the
/// cap stays present.
///
/// This type is thread safe.
#[derive(Debug)]
pub struct StringSetCell {
    data: Mutex<StringSetData>,
    start_time: StartTime,
    clock: Arc<dyn Clock>,
}

impl StringSetCell {
    /// Creates an empty string-set cell on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty string-set cell on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Mutex::new(StringSetData::identity_element()),
            start_time: StartTime::new(),
            clock,
        }
    }

    /// Adds one string to the set.
    pub fn add(&self, value: impl Into<String>) {
        self.data.lock().add_all([value.into()]);
    }

    /// Adds a batch of strings to the set.
    pub fn extend<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Into<String>,
    {
        self.data.lock().add_all(values);
    }

    /// Returns a copy of the current aggregate.
    pub fn cumulative_data(&self) -> StringSetData {
        self.data.lock().clone()
    }

    /// Merges two string-set cells into a brand-new cell.
    ///
    /// Each input is read through its own lock, so this is safe even while
    /// either cell is still receiving updates. Neither input is mutated.
    pub fn combine(&self, other: &StringSetCell) -> StringSetCell {
        let result = StringSetCell::with_clock(self.clock.clone());
        *result.data.lock() = self.cumulative_data().combine(&other.cumulative_data());
        result
    }
}

impl Default for StringSetCell {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricCell for StringSetCell {
    fn kind(&self) -> MetricKind {
        MetricKind::StringSet
    }

    fn update(&self, update: MetricUpdate) -> Result<()> {
        let values = update.into_strings(self.kind())?;
        self.extend(values);
        Ok(())
    }

    fn cumulative(&self) -> MetricSnapshot {
        MetricSnapshot::StringSet(self.cumulative_data())
    }

    fn reset(&self) {
        *self.data.lock() = StringSetData::identity_element();
    }

    fn to_monitoring_record(&self, name: &MetricName, context: &ContextId) -> MonitoringRecord {
        MonitoringRecord::new(
            name.clone(),
            context.clone(),
            self.start_time.capture(self.clock.as_ref()),
            MetricPayload::StringSet {
                data: self.cumulative_data(),
            },
        )
    }
}
