//! Lock-guarded metric cells.
//!
//! A cell accumulates in-memory changes to one metric within one execution
//! context. Producers update a cell from any number of threads; each cell
//! serializes its own updates behind a per-instance `parking_lot` mutex, so
//! unrelated metrics never contend with each other.
//!
//! Cells expose two API layers:
//!
//! - typed inherent methods on the concrete cells (`inc`, `observe`, `set`,
//!   `add`), which are infallible for well-typed input, and
//! - the object-safe [`MetricCell`] trait, which takes dynamically-typed
//!   [`MetricUpdate`] values and is what the surrounding runtime holds cells
//!   through.
//!
//! `combine` on the concrete cells reads each input through that cell's own
//! lock (one lock at a time, never nested), so merging is safe even while
//! either input is still receiving updates. It produces a brand-new cell and
//! mutates neither input.

use crate::aggregate::{DistributionData, GaugeData, StringSetData};
use crate::core::clock::Clock;
use crate::core::error::{Result, TallyError};
use crate::core::types::{ContextId, MetricKind, MetricName};
use crate::export::MonitoringRecord;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

pub mod counter;
pub mod distribution;
pub mod gauge;
pub mod string_set;

pub use counter::CounterCell;
pub use distribution::DistributionCell;
pub use gauge::GaugeCell;
pub use string_set::StringSetCell;

/// A dynamically-typed observation delivered through the [`MetricCell`]
/// trait.
///
/// The typed inherent methods on the concrete cells are the preferred
/// producer surface; this enum exists for the runtime side, where cells are
/// held as trait objects and observations arrive untyped.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricUpdate {
    /// An integer observation
    Int(i64),
    /// A float observation, coerced to integer by truncation
    Float(f64),
    /// A single string element
    Str(String),
    /// A batch of string elements
    Many(Vec<String>),
}

impl MetricUpdate {
    /// Returns the variant name used in kind-mismatch errors.
    pub fn variant_name(&self) -> &'static str {
        match self {
            MetricUpdate::Int(_) => "integer",
            MetricUpdate::Float(_) => "float",
            MetricUpdate::Str(_) => "string",
            MetricUpdate::Many(_) => "string batch",
        }
    }

    /// Coerces this update to an integer observation for `kind`.
    ///
    /// Floats are truncated toward zero; NaN, infinite, and out-of-range
    /// values are rejected without touching cell state.
    pub(crate) fn into_int(self, kind: MetricKind) -> Result<i64> {
        match self {
            MetricUpdate::Int(value) => Ok(value),
            MetricUpdate::Float(value) => coerce_float(value),
            other => Err(TallyError::KindMismatch {
                kind,
                update: other.variant_name(),
            }),
        }
    }

    /// Extracts the string elements of this update for `kind`.
    pub(crate) fn into_strings(self, kind: MetricKind) -> Result<Vec<String>> {
        match self {
            MetricUpdate::Str(value) => Ok(vec![value]),
            MetricUpdate::Many(values) => Ok(values),
            other => Err(TallyError::KindMismatch {
                kind,
                update: other.variant_name(),
            }),
        }
    }
}

impl From<i64> for MetricUpdate {
    fn from(value: i64) -> Self {
        MetricUpdate::Int(value)
    }
}

impl From<f64> for MetricUpdate {
    fn from(value: f64) -> Self {
        MetricUpdate::Float(value)
    }
}

impl From<&str> for MetricUpdate {
    fn from(value: &str) -> Self {
        MetricUpdate::Str(value.to_string())
    }
}

impl From<String> for MetricUpdate {
    fn from(value: String) -> Self {
        MetricUpdate::Str(value)
    }
}

impl From<Vec<String>> for MetricUpdate {
    fn from(values: Vec<String>) -> Self {
        MetricUpdate::Many(values)
    }
}

// 2^63 as f64; exactly representable, unlike i64::MAX itself.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn coerce_float(value: f64) -> Result<i64> {
    if !value.is_finite() {
        return Err(TallyError::invalid_update(format!(
            "observation must be finite, got {value}"
        )));
    }
    let truncated = value.trunc();
    if truncated >= I64_BOUND || truncated < -I64_BOUND {
        return Err(TallyError::invalid_update(format!(
            "observation {value} does not fit in a 64-bit integer"
        )));
    }
    Ok(truncated as i64)
}

/// An immutable snapshot of a cell's cumulative state.
///
/// Snapshots are owned copies; mutating or dropping one never affects the
/// live cell it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSnapshot {
    /// Counter running total
    Counter(i64),
    /// Distribution aggregate
    Distribution(DistributionData),
    /// Gauge aggregate
    Gauge(GaugeData),
    /// String-set aggregate
    StringSet(StringSetData),
}

impl MetricSnapshot {
    /// Kind of the cell this snapshot came from.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricSnapshot::Counter(_) => MetricKind::Counter,
            MetricSnapshot::Distribution(_) => MetricKind::Distribution,
            MetricSnapshot::Gauge(_) => MetricKind::Gauge,
            MetricSnapshot::StringSet(_) => MetricKind::StringSet,
        }
    }

    /// The counter total, if this is a counter snapshot
    pub fn as_counter(&self) -> Option<i64> {
        match self {
            MetricSnapshot::Counter(value) => Some(*value),
            _ => None,
        }
    }

    /// The distribution aggregate, if this is a distribution snapshot
    pub fn as_distribution(&self) -> Option<DistributionData> {
        match self {
            MetricSnapshot::Distribution(data) => Some(*data),
            _ => None,
        }
    }

    /// The gauge aggregate, if this is a gauge snapshot
    pub fn as_gauge(&self) -> Option<GaugeData> {
        match self {
            MetricSnapshot::Gauge(data) => Some(*data),
            _ => None,
        }
    }

    /// The string-set aggregate, if this is a string-set snapshot
    pub fn as_string_set(&self) -> Option<&StringSetData> {
        match self {
            MetricSnapshot::StringSet(data) => Some(data),
            _ => None,
        }
    }
}

/// Accumulates in-memory changes to a metric within one execution context.
///
/// All implementations are thread safe: cells are used inside pipeline
/// runners and are subject to parallel updates. A cell is exclusively owned
/// by one (metric name, context) pair; contexts share combined results,
/// never cell instances.
pub trait MetricCell: Send + Sync {
    /// Kind of this cell.
    fn kind(&self) -> MetricKind;

    /// Applies a dynamically-typed observation.
    ///
    /// Fails with [`TallyError::InvalidUpdate`] on coercion failure and
    /// [`TallyError::KindMismatch`] on a wrong-typed update; in both cases
    /// the cell's state is unchanged.
    fn update(&self, update: MetricUpdate) -> Result<()>;

    /// Returns an immutable snapshot of the cumulative state, safe to read
    /// without holding any lock afterward.
    fn cumulative(&self) -> MetricSnapshot;

    /// Reinitializes the cell to its kind's identity element.
    fn reset(&self);

    /// Converts the current state into a wire-neutral monitoring record.
    ///
    /// The first call captures the cell's start time; repeated calls return
    /// the same start time with a fresh snapshot.
    fn to_monitoring_record(&self, name: &MetricName, context: &ContextId) -> MonitoringRecord;
}

/// A capability that produces a fresh cell on demand.
///
/// The surrounding runtime invokes this lazily whenever it binds a metric
/// name to a context for the first time; the cell layer stays ignorant of
/// how and when that happens.
pub trait MetricCellFactory: Send + Sync {
    /// Kind of cell this factory produces.
    fn kind(&self) -> MetricKind;

    /// Creates a fresh cell at the identity element.
    fn create(&self) -> Box<dyn MetricCell>;
}

macro_rules! cell_factory {
    ($factory:ident, $cell:ident, $kind:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $factory {
            clock: std::sync::Arc<dyn Clock>,
        }

        impl $factory {
            /// Creates a factory producing cells on the system clock.
            pub fn new() -> Self {
                Self::with_clock(std::sync::Arc::new(crate::core::clock::SystemClock))
            }

            /// Creates a factory producing cells on the given clock.
            pub fn with_clock(clock: std::sync::Arc<dyn Clock>) -> Self {
                Self { clock }
            }
        }

        impl Default for $factory {
            fn default() -> Self {
                Self::new()
            }
        }

        impl MetricCellFactory for $factory {
            fn kind(&self) -> MetricKind {
                $kind
            }

            fn create(&self) -> Box<dyn MetricCell> {
                Box::new($cell::with_clock(self.clock.clone()))
            }
        }
    };
}

cell_factory!(
    CounterCellFactory,
    CounterCell,
    MetricKind::Counter,
    "Factory for [`CounterCell`]s."
);
cell_factory!(
    DistributionCellFactory,
    DistributionCell,
    MetricKind::Distribution,
    "Factory for [`DistributionCell`]s."
);
cell_factory!(
    GaugeCellFactory,
    GaugeCell,
    MetricKind::Gauge,
    "Factory for [`GaugeCell`]s."
);
cell_factory!(
    StringSetCellFactory,
    StringSetCell,
    MetricKind::StringSet,
    "Factory for [`StringSetCell`]s."
);

/// Lazily-captured, stable start time for one cell.
///
/// The slot is set exactly once on the first export request and never
/// rewritten; an explicit `Option` rather than a sentinel timestamp.
#[derive(Debug, Default)]
pub(crate) struct StartTime {
    slot: Mutex<Option<DateTime<Utc>>>,
}

impl StartTime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the start time, capturing it from `clock` on first call.
    pub(crate) fn capture(&self, clock: &dyn Clock) -> DateTime<Utc> {
        let mut slot = self.slot.lock();
        *slot.get_or_insert_with(|| clock.now())
    }
}
