//! Error type shared by every module of the crate.

/// Errors raised while building datasets, resolving rules, or scoring subgroups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubgroupError {
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute { attribute: String },

    #[error("value {value:?} is not comparable with numeric attribute {attribute}")]
    IncomparableValue { attribute: String, value: String },

    #[error("unsupported scoring method: {method}")]
    UnsupportedMethod { method: String },

    #[error("malformed ranking at row {row}: {reason}")]
    MalformedRanking { row: usize, reason: String },

    #[error("malformed item order: {reason}")]
    MalformedOrder { reason: String },

    #[error("shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    #[error("subject {subject} is missing from the {table} table")]
    MissingSubject { subject: String, table: &'static str },

    #[error("subject {subject} has no value for {column}")]
    MissingValue { subject: String, column: String },

    #[error("dataset has no subjects")]
    EmptyDataset,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SubgroupError>;
