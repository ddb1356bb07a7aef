//! Build errors for transition machine builders.

use thiserror::Error;

/// Errors that can occur when building a transition machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Machine id is empty. Omit .id(..) to generate one")]
    EmptyId,

    #[error("Machine id '{0}' contains whitespace")]
    WhitespaceInId(String),
}
