//! Gauge aggregate: latest integer value plus the timestamp it was set at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accumulated state of a gauge metric.
///
/// A timestamp of `0` means the gauge was never set; that is the identity
/// element. The timestamp is Unix milliseconds assigned by the accumulation
/// layer's clock at set-time, never supplied by the caller, so it is the
/// sole ordering authority for [`combine`](GaugeData::combine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GaugeData {
    /// Last value set
    pub value: i64,
    /// Unix milliseconds of the last set, `0` when unset
    pub timestamp_ms: i64,
}

impl GaugeData {
    /// The combine-neutral unset gauge.
    pub fn identity_element() -> Self {
        Self {
            value: 0,
            timestamp_ms: 0,
        }
    }

    /// A gauge holding exactly one observation.
    pub fn singleton(value: i64, timestamp_ms: i64) -> Self {
        Self { value, timestamp_ms }
    }

    /// Returns true if the gauge has ever been set.
    pub fn is_set(&self) -> bool {
        self.timestamp_ms != 0
    }

    /// Replaces the stored value unconditionally.
    ///
    /// No timestamp comparison happens here: within one cell the incoming
    /// value is by construction the latest one.
    pub fn set(&mut self, value: i64, timestamp_ms: i64) {
        self.value = value;
        self.timestamp_ms = timestamp_ms;
    }

    /// Merges two gauges, keeping the one with the strictly larger
    /// timestamp. Equal timestamps deterministically keep the receiver.
    pub fn combine(&self, other: &Self) -> Self {
        if other.timestamp_ms > self.timestamp_ms {
            *other
        } else {
            *self
        }
    }

    /// Returns a read-only result view over a copy of this gauge.
    pub fn result(&self) -> GaugeResult {
        GaugeResult { data: *self }
    }
}

impl Default for GaugeData {
    fn default() -> Self {
        Self::identity_element()
    }
}

impl fmt::Display for GaugeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GaugeData(value={}, timestamp_ms={})", self.value, self.timestamp_ms)
    }
}

/// Read-only view of a gauge, with presence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeResult {
    data: GaugeData,
}

impl GaugeResult {
    /// Last value set, or `None` if the gauge was never set
    pub fn value(&self) -> Option<i64> {
        if self.data.is_set() {
            Some(self.data.value)
        } else {
            None
        }
    }

    /// Unix milliseconds of the last set, or `None` if never set
    pub fn timestamp_ms(&self) -> Option<i64> {
        if self.data.is_set() {
            Some(self.data.timestamp_ms)
        } else {
            None
        }
    }

    /// The underlying aggregate snapshot
    pub fn data(&self) -> GaugeData {
        self.data
    }
}
