//! CLI-specific error types and mappings.
//!
//! Maps dispatch, binding and settings errors to exit codes and user-facing
//! messages.

use advisor_core::{DispatchError, InvokeError, SettingsError};
use thiserror::Error;

use crate::binder::BindError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input did not name a command or did not fit its arguments.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Realm or target permission check failed.
    #[error("Not permitted: {0}")]
    Permission(String),

    /// The command handler reported a failure.
    #[error("{0}")]
    Command(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (stdin closed, file unreadable, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Wiring bug: a command was registered or invoked incorrectly.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Command(_) => 1,
            Self::Arguments(_) => 2,   // EX_USAGE
            Self::Internal(_) => 70,   // EX_SOFTWARE
            Self::Io(_) => 74,         // EX_IOERR
            Self::Permission(_) => 77, // EX_NOPERM
            Self::Config(_) => 78,     // EX_CONFIG
        }
    }
}

impl From<DispatchError> for CliError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownCommand(_) => Self::Arguments(err.to_string()),
            DispatchError::WrongRealm { .. } | DispatchError::PermissionDenied { .. } => {
                Self::Permission(err.to_string())
            }
            DispatchError::Registry(registry_err) => Self::Internal(registry_err.to_string()),
            DispatchError::Invoke(InvokeError::Handler(handler_err)) => {
                Self::Command(format!("{handler_err:#}"))
            }
            DispatchError::Invoke(invoke_err) => Self::Internal(invoke_err.to_string()),
        }
    }
}

impl From<BindError> for CliError {
    fn from(err: BindError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
