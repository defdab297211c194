//! Port definitions (trait abstractions) for the systems around dispatch.
//!
//! Ports define what the core expects from its host: an execution context
//! handed to every command, and a permission gate consulted before invocation.
//! They contain no implementation details beyond small default adapters.

pub mod context;
pub mod permission;

pub use context::{ExecutionContext, Identity};
pub use permission::{LevelPermissionGate, PermissionGate};
