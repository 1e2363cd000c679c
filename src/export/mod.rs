//! Wire-neutral monitoring records.
//!
//! The cell layer's only export obligation is to supply a lock-consistent
//! cumulative snapshot together with a metric identity, a context identity,
//! and a stable start time. [`MonitoringRecord`] is that carrier; turning it
//! into a backend-specific wire format is the consuming exporter's concern.

use crate::aggregate::{DistributionData, GaugeData, StringSetData};
use crate::cell::MetricSnapshot;
use crate::core::error::Result;
use crate::core::types::{ContextId, MetricKind, MetricName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The cumulative payload of one monitoring record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricPayload {
    /// Counter running total
    Counter {
        /// The running total
        value: i64,
    },
    /// Distribution aggregate
    Distribution {
        /// The cumulative aggregate
        data: DistributionData,
    },
    /// Gauge aggregate
    Gauge {
        /// The cumulative aggregate
        data: GaugeData,
    },
    /// String-set aggregate
    StringSet {
        /// The cumulative aggregate
        data: StringSetData,
    },
}

impl MetricPayload {
    /// Kind of the metric this payload describes.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricPayload::Counter { .. } => MetricKind::Counter,
            MetricPayload::Distribution { .. } => MetricKind::Distribution,
            MetricPayload::Gauge { .. } => MetricKind::Gauge,
            MetricPayload::StringSet { .. } => MetricKind::StringSet,
        }
    }
}

impl From<MetricSnapshot> for MetricPayload {
    fn from(snapshot: MetricSnapshot) -> Self {
        match snapshot {
            MetricSnapshot::Counter(value) => MetricPayload::Counter { value },
            MetricSnapshot::Distribution(data) => MetricPayload::Distribution { data },
            MetricSnapshot::Gauge(data) => MetricPayload::Gauge { data },
            MetricSnapshot::StringSet(data) => MetricPayload::StringSet { data },
        }
    }
}

/// One exported view of a cell: identity, context, stable start time, and
/// the cumulative snapshot at export time.
///
/// The snapshot is internally consistent (taken under the cell's lock) and
/// owned by the record; the start time is captured on the cell's first
/// export and identical across repeated exports of the same cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringRecord {
    /// Identity of the metric
    pub name: MetricName,
    /// Identity of the execution context the cell was scoped to
    pub context: ContextId,
    /// When the cell was first exported
    pub start_time: DateTime<Utc>,
    /// Cumulative snapshot at export time
    pub payload: MetricPayload,
}

impl MonitoringRecord {
    /// Creates a monitoring record.
    pub fn new(
        name: MetricName,
        context: ContextId,
        start_time: DateTime<Utc>,
        payload: MetricPayload,
    ) -> Self {
        Self {
            name,
            context,
            start_time,
            payload,
        }
    }

    /// Kind of the metric this record describes.
    pub fn kind(&self) -> MetricKind {
        self.payload.kind()
    }

    /// Renders the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
