//! Invocation engine.
//!
//! Turns a typed handler routine into one of two calling conventions once, at
//! registration time, and executes it on demand:
//!
//! - `binding` - [`HandlerBinding`] and the [`IntoHandlerBinding`] conversion
//! - `call_args` - the positional call sequence, context first
//! - `error` - [`InvokeError`]

mod binding;
mod call_args;
mod error;

pub use binding::{BindingKind, HandlerBinding, HandlerResult, IntoHandlerBinding, ParameterInfo};
pub use call_args::{ArgValue, CallArg};
pub use error::InvokeError;
