use crate::core::error::{Result, TallyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of metric kinds supported by the accumulation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Integer counter with delta updates
    Counter,
    /// Sum/count/min/max distribution of integer observations
    Distribution,
    /// Last-set integer value with a timestamp
    Gauge,
    /// Bounded set of strings
    StringSet,
}

impl MetricKind {
    /// Returns the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Distribution => "distribution",
            MetricKind::Gauge => "gauge",
            MetricKind::StringSet => "string_set",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a metric.
///
/// User metrics are addressed by namespace plus name; system metrics carry
/// an arbitrary URN with a label map. The two forms export differently, so
/// the distinction is part of the identity itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// A user-defined metric addressed by namespace and name.
    User {
        /// Namespace the metric belongs to, e.g. a transform or package path
        namespace: String,
        /// Name of the metric within the namespace
        name: String,
    },
    /// A system metric addressed by URN with labels.
    Urn {
        /// Uniform resource name of the metric
        urn: String,
        /// Labels qualifying the metric, e.g. the transform it describes
        labels: BTreeMap<String, String>,
    },
}

impl MetricName {
    /// Creates a user metric name after validation
    pub fn user(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.is_empty() {
            return Err(TallyError::invalid_name("namespace cannot be empty"));
        }
        if name.is_empty() {
            return Err(TallyError::invalid_name("name cannot be empty"));
        }
        Ok(MetricName::User { namespace, name })
    }

    /// Creates a URN metric name after validation
    pub fn urn(urn: impl Into<String>, labels: BTreeMap<String, String>) -> Result<Self> {
        let urn = urn.into();
        if urn.is_empty() {
            return Err(TallyError::invalid_name("urn cannot be empty"));
        }
        Ok(MetricName::Urn { urn, labels })
    }

    /// Returns true if this is a user metric name
    pub fn is_user(&self) -> bool {
        matches!(self, MetricName::User { .. })
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricName::User { namespace, name } => write!(f, "{}:{}", namespace, name),
            MetricName::Urn { urn, .. } => write!(f, "{}", urn),
        }
    }
}

/// Identity of the execution context a cell is scoped to.
///
/// One cell exists per (metric name, context) pair; contexts never share
/// cell instances, only combined results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    /// Creates a new ContextId after validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(TallyError::invalid_context("ContextId cannot be empty"));
        }
        Ok(ContextId(id))
    }

    /// Returns the string representation of the context ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
