//! Checkpoint error types.

use crate::core::Status;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Two nodes in the captured tree share an id
    #[error("Duplicate machine id '{0}'")]
    DuplicateId(String),

    /// A node holds a status the transition table can never produce
    #[error("Machine '{id}' holds unreachable status {status}")]
    UnreachableStatus { id: String, status: Status },

    /// Checkpoint data failed validation
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
