//! Distribution aggregate: sum, count, min, and max of integer observations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accumulated state of a distribution metric.
///
/// The empty distribution uses sentinel extrema (`i64::MAX` for min,
/// `i64::MIN` for max) so that any real observation strictly improves both
/// under [`combine`](DistributionData::combine) without special-casing the
/// first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionData {
    /// Sum of all observations
    pub sum: i64,
    /// Number of observations
    pub count: i64,
    /// Smallest observation, or `i64::MAX` when empty
    pub min: i64,
    /// Largest observation, or `i64::MIN` when empty
    pub max: i64,
}

impl DistributionData {
    /// Creates a distribution from raw fields.
    ///
    /// A zero count normalizes every field to the identity element, so an
    /// "empty" distribution can never carry stale extrema.
    pub fn new(sum: i64, count: i64, min: i64, max: i64) -> Self {
        if count == 0 {
            Self::identity_element()
        } else {
            Self { sum, count, min, max }
        }
    }

    /// The combine-neutral empty distribution.
    pub fn identity_element() -> Self {
        Self {
            sum: 0,
            count: 0,
            min: i64::MAX,
            max: i64::MIN,
        }
    }

    /// A distribution of exactly one observation.
    pub fn singleton(value: i64) -> Self {
        Self {
            sum: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    /// Returns true if no observations have been folded in.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Folds one observation into this distribution in place.
    pub fn observe(&mut self, value: i64) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(value);
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Merges two distributions into a new one.
    ///
    /// Commutative and associative; combining with the identity element
    /// returns the other operand unchanged.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            sum: self.sum.wrapping_add(other.sum),
            count: self.count + other.count,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a read-only result view over a copy of this distribution.
    pub fn result(&self) -> DistributionResult {
        DistributionResult { data: *self }
    }
}

impl Default for DistributionData {
    fn default() -> Self {
        Self::identity_element()
    }
}

impl fmt::Display for DistributionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DistributionData(sum={}, count={}, min={}, max={})",
            self.sum, self.count, self.min, self.max
        )
    }
}

/// Read-only view of a distribution, with derived fields.
///
/// Owns a copy of the aggregate, never a reference into a live cell, so it
/// stays valid and immutable no matter what happens to the cell afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionResult {
    data: DistributionData,
}

impl DistributionResult {
    /// Number of observations
    pub fn count(&self) -> i64 {
        self.data.count
    }

    /// Sum of all observations
    pub fn sum(&self) -> i64 {
        self.data.sum
    }

    /// Smallest observation, or `None` if the distribution is empty
    pub fn min(&self) -> Option<i64> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.data.min)
        }
    }

    /// Largest observation, or `None` if the distribution is empty
    pub fn max(&self) -> Option<i64> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.data.max)
        }
    }

    /// Mean of the observations, or `None` if the distribution is empty.
    pub fn mean(&self) -> Option<f64> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.data.sum as f64 / self.data.count as f64)
        }
    }

    /// The underlying aggregate snapshot
    pub fn data(&self) -> DistributionData {
        self.data
    }
}
