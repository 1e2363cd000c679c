use crate::core::types::MetricKind;
use thiserror::Error;

/// Errors surfaced by the accumulation layer.
///
/// Every failure is synchronous and local to the call that produced it; the
/// cell layer never retries and never reports errors on a side channel. The
/// one deliberately non-error condition is string-set capacity exhaustion,
/// which is logged at warning level and otherwise silent.
#[derive(Error, Debug)]
pub enum TallyError {
    /// An observation could not be coerced to the cell's numeric domain.
    /// The cell's state is left untouched.
    #[error("Invalid metric update: {0}")]
    InvalidUpdate(String),

    /// A dynamically-typed update was handed to a cell of the wrong kind,
    /// e.g. a string into a Counter. This is a programmer error and fails
    /// fast rather than being swallowed.
    #[error("{kind} cell cannot accept {update} updates")]
    KindMismatch {
        /// Kind of the cell that rejected the update.
        kind: MetricKind,
        /// Variant name of the rejected update value.
        update: &'static str,
    },

    /// A metric identity failed validation at construction.
    #[error("Invalid metric name: {0}")]
    InvalidName(String),

    /// An execution-context identity failed validation at construction.
    #[error("Invalid context id: {0}")]
    InvalidContext(String),

    /// A monitoring record could not be rendered.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;

impl TallyError {
    /// Creates a new invalid-update error
    pub fn invalid_update<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUpdate(msg.into())
    }

    /// Creates a new invalid-name error
    pub fn invalid_name<S: Into<String>>(msg: S) -> Self {
        Self::InvalidName(msg.into())
    }

    /// Creates a new invalid-context error
    pub fn invalid_context<S: Into<String>>(msg: S) -> Self {
        Self::InvalidContext(msg.into())
    }

    /// Returns true if this error is a contract violation by the caller
    /// rather than bad observation data.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::KindMismatch { .. })
    }

    /// Returns the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidUpdate(_) => "coercion",
            Self::KindMismatch { .. } => "contract",
            Self::InvalidName(_) | Self::InvalidContext(_) => "validation",
            Self::Serialization(_) => "serialization",
        }
    }
}
