//! Bounded string-set aggregate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Hard cap on the summed byte length of all elements in one set.
///
/// The element that first pushes the running size over this cap is still
/// retained; everything after it is dropped without error.
pub const STRING_SET_CAPACITY_BYTES: usize = 1_000_000;

/// Accumulated state of a string-set metric.
///
/// Elements are only ever added within the lifetime of one aggregate, never
/// removed. Once the running byte size exceeds
/// [`STRING_SET_CAPACITY_BYTES`], further additions become no-ops and a
/// warning is logged; everything accumulated before the cap stays present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StringSetData {
    elements: HashSet<String>,
    size_bytes: usize,
}

impl StringSetData {
    /// The combine-neutral empty set.
    pub fn identity_element() -> Self {
        Self::default()
    }

    /// A set holding exactly one element.
    pub fn singleton(value: impl Into<String>) -> Self {
        let value = value.into();
        let size_bytes = value.len();
        let mut elements = HashSet::new();
        elements.insert(value);
        Self { elements, size_bytes }
    }

    /// Builds a set from existing elements, recomputing the byte size.
    pub fn from_elements(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let elements: HashSet<String> = values.into_iter().map(Into::into).collect();
        let size_bytes = elements.iter().map(String::len).sum();
        Self { elements, size_bytes }
    }

    /// The elements currently in the set.
    pub fn elements(&self) -> &HashSet<String> {
        &self.elements
    }

    /// Summed byte length of all elements.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of elements in the set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if the set contains the given string.
    pub fn contains(&self, value: &str) -> bool {
        self.elements.contains(value)
    }

    /// Adds each not-already-present string until the capacity is crossed.
    ///
    /// Duplicates cost nothing and do not change the byte size. The scan is
    /// O(number of new strings); it never walks the existing elements.
    pub fn add_all<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Into<String>,
    {
        self.size_bytes = add_until_capacity(&mut self.elements, self.size_bytes, values);
    }

    /// Merges two sets into a new one under the capacity rule.
    ///
    /// An empty operand short-circuits to a copy of the other. Otherwise the
    /// larger set is copied and the smaller's elements are inserted into it,
    /// stopping once the capacity is crossed.
    pub fn combine(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let (base, extra) = if self.elements.len() >= other.elements.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut elements = base.elements.clone();
        let size_bytes = add_until_capacity(
            &mut elements,
            base.size_bytes,
            extra.elements.iter().map(String::as_str),
        );
        Self { elements, size_bytes }
    }
}

impl fmt::Display for StringSetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringSetData({} elements, {} bytes)", self.len(), self.size_bytes)
    }
}

/// Inserts strings into `set` until the running byte size crosses the
/// capacity, returning the new size. Warns once per call on crossing.
fn add_until_capacity<I, S>(set: &mut HashSet<String>, current_size: usize, values: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Into<String>,
{
    if current_size > STRING_SET_CAPACITY_BYTES {
        return current_size;
    }

    let mut size = current_size;
    for value in values {
        if set.contains(value.as_ref()) {
            continue;
        }
        size += value.as_ref().len();
        let crossed = size > STRING_SET_CAPACITY_BYTES;
        set.insert(value.into());
        if crossed {
            warn!(
                size_bytes = size,
                capacity_bytes = STRING_SET_CAPACITY_BYTES,
                "string set metric reached capacity, further elements will be dropped"
            );
            break;
        }
    }
    size
}
