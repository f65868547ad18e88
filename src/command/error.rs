// Command error types

use crate::canvas::CanvasError;
use crate::color::ColorError;

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while executing or undoing a command
///
/// None of these are recovered by the history: the stacks are left as they
/// were before the attempt and the error goes back to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// Command execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Invalid state for this operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The rendering collaborator refused a request
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    /// Malformed color input
    #[error("Color error: {0}")]
    Color(#[from] ColorError),
}
