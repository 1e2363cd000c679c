//! Pure, combinable value types held inside metric cells.
//!
//! Each aggregate is a monoid: it has an identity element that is neutral
//! under `combine`, a singleton constructor for a single observation, and a
//! commutative, associative pairwise `combine`. None of these types know
//! anything about locking; concurrency lives entirely in the `cell` layer.

pub mod distribution;
pub mod gauge;
pub mod string_set;

pub use distribution::{DistributionData, DistributionResult};
pub use gauge::{GaugeData, GaugeResult};
pub use string_set::{StringSetData, STRING_SET_CAPACITY_BYTES};
