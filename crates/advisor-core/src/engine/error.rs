//! Invocation error types.

use thiserror::Error;

/// Errors surfaced by [`Command::invoke`](crate::domain::Command::invoke).
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The call sequence is empty or does not start with an execution context.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The command carries no handler binding. Registration is broken.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A positional value does not have the handler's declared parameter type.
    #[error("Argument {position} is not a {expected}")]
    ArgumentMismatch {
        /// Index in the call sequence (the context is 0).
        position: usize,
        /// Declared parameter type.
        expected: &'static str,
    },

    /// The call sequence ended before every declared parameter was filled.
    #[error("Argument {position} ({expected}) was not supplied")]
    MissingArgument {
        /// Index in the call sequence (the context is 0).
        position: usize,
        /// Declared parameter type.
        expected: &'static str,
    },

    /// The handler itself failed; passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
}

impl InvokeError {
    /// Whether the error came from the handler rather than from the engine.
    pub const fn is_handler_error(&self) -> bool {
        matches!(self, Self::Handler(_))
    }
}
