//! Services that sit on top of the descriptor model.
//!
//! - `registry` - name/alias index of registered commands
//! - `dispatcher` - lookup, realm and permission checks, invocation

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{DispatchError, Dispatcher, SharedRegistry};
pub use registry::{CommandRegistry, RegistryError};
