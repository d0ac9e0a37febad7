use thiserror::Error;

/// Error types for spark engine construction and configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SparkError {
    /// A configuration field holds a value the engine cannot run with
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// No preset is registered under the given name
    #[error("Unknown preset: '{0}' (expected one of: branching, wobble, meteor)")]
    UnknownPreset(String),
}

impl SparkError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type using SparkError
pub type Result<T> = std::result::Result<T, SparkError>;
