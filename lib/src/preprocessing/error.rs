//! Error types for preprocessing transforms.

use thiserror::Error;

/// Error type for transform construction and application.
#[derive(Debug, Error)]
pub enum TransformError {
    /// `apply_keys` was empty or named something other than `input`/`label`.
    #[error("apply_keys should be a non empty subset of ('input', 'label'), but got {0}")]
    InvalidApplyKeys(String),
    /// Shape mismatch between expected and actual tensor dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Squeeze only produces rank-3 tensors.
    #[error("Only support squeeze data to ndim=3 now, but got ndim={0}")]
    UnsupportedRank(usize),
    /// Operand shapes cannot be broadcast together.
    #[error("operands could not be broadcast together with shapes {lhs} {rhs}")]
    Broadcast { lhs: String, rhs: String },
    /// Configuration referenced a function that was never registered.
    #[error("Unknown transform function: {0}")]
    UnknownFunction(String),
    /// The transform has no inverse.
    #[error("{0} does not support inverse")]
    NotInvertible(&'static str),
    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for TransformError {
    fn from(err: bincode::Error) -> Self {
        TransformError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::SerializationError(err.to_string())
    }
}
