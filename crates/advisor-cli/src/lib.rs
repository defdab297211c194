//! Console front end for advisor commands.
//!
//! Parses a console line into a command and typed arguments, runs it through
//! the core dispatcher as the configured operator, and prints the replies.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs
use anyhow as _;
use dotenvy as _;
use serde_json as _;
use tracing_subscriber as _;

pub mod binder;
pub mod bootstrap;
pub mod builtin;
pub mod console;
pub mod context;
pub mod error;
pub mod parser;

// Re-export primary types for convenient access
pub use binder::{BindError, Invocation, parse_line};
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use console::{execute_line, run};
pub use context::ConsoleContext;
pub use error::CliError;
pub use parser::Cli;
