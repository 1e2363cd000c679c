//! Tally - concurrent metric accumulation cells.
//!
//! Tally is the in-memory accumulation and merge engine for metrics produced
//! inside a data-processing runtime. Each metric gets one lock-guarded cell
//! per execution context; producers update cells concurrently, and the
//! runtime later folds the resulting snapshots together to obtain a global
//! view.
//!
//! # Features
//!
//! - **Four metric kinds**: Counter, Distribution, Gauge, and StringSet
//! - **Thread safe**: every cell serializes its own updates behind a
//!   per-instance lock, no global lock across unrelated metrics
//! - **Mergeable**: aggregates form a monoid with a commutative, associative
//!   `combine` and an explicit identity element
//! - **Immutable snapshots**: readers get owned copies, never references
//!   into live state
//! - **Injected capabilities**: time source and logging are supplied by the
//!   surrounding runtime, not owned by the cells
//!
//! # Architecture
//!
//! - `aggregate`: the pure, combinable value types held inside cells
//! - `cell`: the lock-guarded cells, the `MetricCell` trait, and factories
//! - `core`: identities, errors, and the clock capability
//! - `export`: conversion of snapshots into wire-neutral monitoring records
//!
//! # Example
//!
//! ```
//! use tally::cell::CounterCell;
//!
//! let requests = CounterCell::new();
//! requests.inc(1);
//! requests.inc(1);
//! requests.dec(1);
//! assert_eq!(requests.value(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod aggregate;
pub mod cell;
pub mod core;
pub mod export;

// Re-export core types for convenience
pub use crate::core::{ContextId, MetricKind, MetricName, Result, TallyError};
