//! Error types for classification and segmentation.

use thiserror::Error;

/// Errors raised by the statistics, classifier and segment builder.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnomalyError {
    /// Fewer samples than the computation needs.
    #[error("insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// A sample does not carry the requested field.
    #[error("sample {index} has no field `{field}`")]
    MissingField { index: usize, field: String },

    /// A sample value is NaN or infinite.
    #[error("sample {index} has a non-finite value for `{field}`")]
    NonFiniteValue { index: usize, field: String },

    /// Mean or std dev overflowed although every input value was finite.
    #[error("series {0} is not finite")]
    NonFiniteStatistic(&'static str),

    /// A point has not been classified for the requested field.
    #[error("point {index} was not classified for `{field}`")]
    Unclassified { index: usize, field: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnomalyError>;
