//! Positional call sequence.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::ports::ExecutionContext;

/// An opaque, already-bound argument value.
pub type ArgValue = Box<dyn Any + Send>;

/// One slot of a call sequence.
///
/// A well-formed sequence is `[Context, Value, Value, ...]` with values in the
/// command's argument declaration order.
pub enum CallArg {
    Context(Arc<dyn ExecutionContext>),
    Value(ArgValue),
}

impl CallArg {
    pub fn context(ctx: Arc<dyn ExecutionContext>) -> Self {
        Self::Context(ctx)
    }

    pub fn value<T: Any + Send>(value: T) -> Self {
        Self::Value(Box::new(value))
    }

    /// Erase the slot into a plain value. A context in a non-leading slot is
    /// carried as `Arc<dyn ExecutionContext>`.
    pub fn into_value(self) -> ArgValue {
        match self {
            Self::Context(ctx) => Box::new(ctx),
            Self::Value(value) => value,
        }
    }
}

impl fmt::Debug for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(ctx) => f
                .debug_struct("Context")
                .field("caller", &ctx.caller().name)
                .field("realm", &ctx.realm())
                .finish(),
            Self::Value(_) => f.write_str("Value(..)"),
        }
    }
}

impl From<Arc<dyn ExecutionContext>> for CallArg {
    fn from(ctx: Arc<dyn ExecutionContext>) -> Self {
        Self::Context(ctx)
    }
}

impl From<ArgValue> for CallArg {
    fn from(value: ArgValue) -> Self {
        Self::Value(value)
    }
}
