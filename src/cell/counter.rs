//! Counter cell: a running integer total fed by deltas.

use crate::cell::{MetricCell, MetricSnapshot, MetricUpdate, StartTime};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Result;
use crate::core::types::{ContextId, MetricKind, MetricName};
use crate::export::{MetricPayload, MonitoringRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks the running total of a counter metric.
///
/// Each cell tracks the state of an integer metric independently per context
/// per bundle; cells are aggregated by the runner afterwards. Arithmetic is
/// 64-bit wrapping; overflow is documented as undefined rather than checked.
///
/// This type is thread safe.
#[derive(Debug)]
pub struct CounterCell {
    value: Mutex<i64>,
    start_time: StartTime,
    clock: Arc<dyn Clock>,
}

impl CounterCell {
    /// Creates a counter cell at zero on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a counter cell at zero on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            value: Mutex::new(0),
            start_time: StartTime::new(),
            clock,
        }
    }

    /// Increments the counter by `n`.
    pub fn inc(&self, n: i64) {
        self.add(n);
    }

    /// Decrements the counter by `n`.
    pub fn dec(&self, n: i64) {
        self.add(n.wrapping_neg());
    }

    /// Adds a signed delta to the running total.
    pub fn add(&self, delta: i64) {
        let mut value = self.value.lock();
        *value = value.wrapping_add(delta);
    }

    /// Returns the current running total.
    pub fn value(&self) -> i64 {
        *self.value.lock()
    }

    /// Merges two counters into a brand-new cell reading their sum.
    ///
    /// Each input is read through its own lock, so this is safe even while
    /// either cell is still receiving updates. Neither input is mutated.
    pub fn combine(&self, other: &CounterCell) -> CounterCell {
        let result = CounterCell::with_clock(self.clock.clone());
        result.add(self.value().wrapping_add(other.value()));
        result
    }
}

impl Default for CounterCell {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricCell for CounterCell {
    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn update(&self, update: MetricUpdate) -> Result<()> {
        let delta = update.into_int(self.kind())?;
        self.add(delta);
        Ok(())
    }

    fn cumulative(&self) -> MetricSnapshot {
        MetricSnapshot::Counter(self.value())
    }

    fn reset(&self) {
        *self.value.lock() = 0;
    }

    fn to_monitoring_record(&self, name: &MetricName, context: &ContextId) -> MonitoringRecord {
        MonitoringRecord::new(
            name.clone(),
            context.clone(),
            self.start_time.capture(self.clock.as_ref()),
            MetricPayload::Counter { value: self.value() },
        )
    }
}
