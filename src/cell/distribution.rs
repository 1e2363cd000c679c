//! Distribution cell: folds integer observations into sum/count/min/max.

use crate::aggregate::{DistributionData, DistributionResult};
use crate::cell::{MetricCell, MetricSnapshot, MetricUpdate, StartTime};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::Result;
use crate::core::types::{ContextId, MetricKind, MetricName};
use crate::export::{MetricPayload, MonitoringRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks the distribution of integer observations for one metric.
///
/// Each cell tracks its metric independently per context per bundle and is
/// aggregated by the runner afterwards.
///
/// This type is thread safe.
#[derive(Debug)]
pub struct DistributionCell {
    data: Mutex<DistributionData>,
    start_time: StartTime,
    clock: Arc<dyn Clock>,
}

impl DistributionCell {
    /// Creates an empty distribution cell on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty distribution cell on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Mutex::new(DistributionData::identity_element()),
            start_time: StartTime::new(),
            clock,
        }
    }

    /// Folds one observation into the distribution.
    pub fn observe(&self, value: i64) {
        self.data.lock().observe(value);
    }

    /// Returns a copy of the current aggregate.
    pub fn cumulative_data(&self) -> DistributionData {
        *self.data.lock()
    }

    /// Returns a read-only result view of the current aggregate.
    pub fn result(&self) -> DistributionResult {
        self.cumulative_data().result()
    }

    /// Merges two distribution cells into a brand-new cell.
    ///
    /// Each input is read through its own lock, so this is safe even while
    /// either cell is still receiving updates. Neither input is mutated.
    pub fn combine(&self, other: &DistributionCell) -> DistributionCell {
        let result = DistributionCell::with_clock(self.clock.clone());
        *result.data.lock() = self.cumulative_data().combine(&other.cumulative_data());
        result
    }
}

impl Default for DistributionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricCell for DistributionCell {
    fn kind(&self) -> MetricKind {
        MetricKind::Distribution
    }

    fn update(&self, update: MetricUpdate) -> Result<()> {
        let value = update.into_int(self.kind())?;
        self.observe(value);
        Ok(())
    }

    fn cumulative(&self) -> MetricSnapshot {
        MetricSnapshot::Distribution(self.cumulative_data())
    }

    fn reset(&self) {
        *self.data.lock() = DistributionData::identity_element();
    }

    fn to_monitoring_record(&self, name: &MetricName, context: &ContextId) -> MonitoringRecord {
        MonitoringRecord::new(
            name.clone(),
            context.clone(),
            self.start_time.capture(self.clock.as_ref()),
            MetricPayload::Distribution {
                data: self.cumulative_data(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_observe_folds_extrema() {
        let cell = DistributionCell::new();
        for value in [1, 5, 3] {
            cell.observe(value);
        }
        assert_eq!(cell.cumulative_data(), DistributionData::new(9, 3, 1, 5));
        assert_eq!(cell.result().mean(), Some(3.0));
    }

    #[test]
    fn test_empty_cell_has_no_mean() {
        let cell = DistributionCell::new();
        assert_eq!(cell.result().mean(), None);
    }

    #[test]
    fn test_combine_leaves_inputs_unchanged() {
        let a = DistributionCell::new();
        let b = DistributionCell::new();
        for value in [1, 5, 3] {
            a.observe(value);
        }
        b.observe(2);

        let merged = a.combine(&b);
        assert_eq!(merged.cumulative_data(), DistributionData::new(11, 4, 1, 5));
        assert_eq!(a.cumulative_data(), DistributionData::new(9, 3, 1, 5));
        assert_eq!(b.cumulative_data(), DistributionData::singleton(2));
    }

    #[test]
    fn test_reset() {
        let cell = DistributionCell::new();
        cell.observe(10);
        cell.reset();
        assert_eq!(cell.cumulative_data(), DistributionData::identity_element());
    }

    #[test]
    fn test_dynamic_update_coerces_floats() {
        let cell = DistributionCell::new();
        cell.update(MetricUpdate::Float(2.7)).unwrap();
        assert_eq!(cell.cumulative_data(), DistributionData::singleton(2));
    }

    #[test]
    fn test_dynamic_update_rejects_nan() {
        let cell = DistributionCell::new();
        assert!(cell.update(MetricUpdate::Float(f64::NAN)).is_err());
        assert!(cell.cumulative_data().is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_live_cell() {
        let cell = DistributionCell::new();
        cell.observe(1);
        let snapshot = cell.cumulative_data();
        cell.observe(100);
        assert_eq!(snapshot, DistributionData::singleton(1));
    }
}
