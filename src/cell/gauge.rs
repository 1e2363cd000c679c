//! Gauge cell: latest value wins, ordered by the cell's own clock.

use crate::aggregate::{GaugeData, GaugeResult};
use crate::cell::{MetricCell, MetricSnapshot, MetricUpdate, StartTime};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Result;
use crate::core::types::{ContextId, MetricKind, MetricName};
use crate::export::{MetricPayload, MonitoringRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks the latest value of a gauge metric.
///
/// The cell stamps every set with its injected clock; that timestamp is the
/// sole ordering authority when gauges from different contexts are combined
/// later. No history is kept.
///
/// This type is thread safe.
#[derive(Debug)]
pub struct GaugeCell {
    data: Mutex<GaugeData>,
    start_time: StartTime,
    clock: Arc<dyn Clock>,
}

impl GaugeCell {
    /// Creates an unset gauge cell on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an unset gauge cell on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Mutex::new(GaugeData::identity_element()),
            start_time: StartTime::new(),
            clock,
        }
    }

    /// Replaces the stored value and stamps the current time.
    ///
    /// Stamping happens under the lock so the stored value and timestamp
    /// always belong to the same set; clocks are required to be cheap.
    pub fn set(&self, value: i64) {
        let mut data = self.data.lock();
        data.set(value, self.clock.now_millis());
    }

    /// Returns a copy of the current aggregate.
    pub fn cumulative_data(&self) -> GaugeData {
        *self.data.lock()
    }

    /// Returns a read-only result view of the current aggregate.
    pub fn result(&self) -> GaugeResult {
        self.cumulative_data().result()
    }

    /// Merges two gauge cells into a brand-new cell holding the later set.
    ///
    /// Each input is read through its own lock, so this is safe even while
    /// either cell is still receiving updates. Neither input is mutated.
    pub fn combine(&self, other: &GaugeCell) -> GaugeCell {
        let result = GaugeCell::with_clock(self.clock.clone());
        *result.data.lock() = self.cumulative_data().combine(&other.cumulative_data());
        result
    }
}

impl Default for GaugeCell {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricCell for GaugeCell {
    fn kind(&self) -> MetricKind {
        MetricKind::Gauge
    }

    fn update(&self, update: MetricUpdate) -> Result<()> {
        let value = update.into_int(self.kind())?;
        self.set(value);
        Ok(())
    }

    fn cumulative(&self) -> MetricSnapshot {
        MetricSnapshot::Gauge(self.cumulative_data())
    }

    fn reset(&self) {
        *self.data.lock() = GaugeData::identity_element();
    }

    fn to_monitoring_record(&self, name: &MetricName, context: &ContextId) -> MonitoringRecord {
        MonitoringRecord::new(
            name.clone(),
            context.clone(),
            self.start_time.capture(self.clock.as_ref()),
            MetricPayload::Gauge {
                data: self.cumulative_data(),
            },
        )
    }
}
