//! Handler bindings.
//!
//! A handler routine is any `Fn(&dyn ExecutionContext, A1, .., An) -> anyhow::Result<()>`
//! with `n` between 0 and 8. [`IntoHandlerBinding`] inspects that shape once,
//! when the command is built, and produces one of two bindings:
//!
//! - [`HandlerBinding::Fast`] for handlers whose only parameter is the context.
//!   Invocation passes the context straight through with no per-call
//!   unpacking.
//! - [`HandlerBinding::Generic`] for everything else. Invocation receives the
//!   positional values after the context and unpacks each into the declared
//!   parameter type.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ArgValue, InvokeError};
use crate::ports::ExecutionContext;

/// Return type of every handler routine.
pub type HandlerResult = anyhow::Result<()>;

type FastFn = dyn Fn(&dyn ExecutionContext) -> HandlerResult + Send + Sync;
type GenericFn = dyn Fn(&dyn ExecutionContext, Vec<ArgValue>) -> Result<(), InvokeError> + Send + Sync;

/// A declared handler parameter (the context excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    /// Index in the call sequence; the context occupies 0.
    pub position: usize,
    /// Rust type name of the parameter.
    pub type_name: String,
}

impl ParameterInfo {
    pub fn of<T: ?Sized>(position: usize) -> Self {
        Self {
            position,
            type_name: type_name::<T>().to_string(),
        }
    }
}

/// Which calling convention a binding uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Fast,
    Generic,
}

/// The callable a command dispatches to.
#[derive(Clone)]
pub enum HandlerBinding {
    /// Context-only handler.
    Fast(Arc<FastFn>),
    /// Handler taking the context plus `parameters`, in order.
    Generic {
        parameters: Vec<ParameterInfo>,
        call: Arc<GenericFn>,
    },
}

impl HandlerBinding {
    /// Bind a handler, choosing the calling convention from its signature.
    pub fn new<Args, H>(handler: H) -> Self
    where
        H: IntoHandlerBinding<Args>,
    {
        handler.into_binding()
    }

    /// Bind a handler that unpacks its own positional values.
    ///
    /// Useful when parameter types are only known at runtime (scripted
    /// handlers, forwarding shims). Always produces a generic binding.
    pub fn variadic<F>(parameters: Vec<ParameterInfo>, handler: F) -> Self
    where
        F: Fn(&dyn ExecutionContext, Vec<ArgValue>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::Generic {
            parameters,
            call: Arc::new(
                move |ctx: &dyn ExecutionContext, values: Vec<ArgValue>| -> Result<(), InvokeError> {
                    handler(ctx, values).map_err(InvokeError::Handler)
                },
            ),
        }
    }

    pub const fn kind(&self) -> BindingKind {
        match self {
            Self::Fast(_) => BindingKind::Fast,
            Self::Generic { .. } => BindingKind::Generic,
        }
    }

    /// Declared parameters after the context. Empty for fast bindings.
    pub fn parameters(&self) -> &[ParameterInfo] {
        match self {
            Self::Fast(_) => &[],
            Self::Generic { parameters, .. } => parameters,
        }
    }

    /// Number of declared parameters after the context.
    pub fn arity(&self) -> usize {
        self.parameters().len()
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast(_) => f.write_str("Fast"),
            Self::Generic { parameters, .. } => f
                .debug_struct("Generic")
                .field("parameters", parameters)
                .finish_non_exhaustive(),
        }
    }
}

/// Conversion from a typed handler routine into a [`HandlerBinding`].
///
/// `Args` is a marker tuple of the handler's parameter types after the
/// context; it only exists to keep the implementations for different arities
/// apart.
pub trait IntoHandlerBinding<Args>: Send + Sync + 'static {
    fn into_binding(self) -> HandlerBinding;
}

impl IntoHandlerBinding<HandlerBinding> for HandlerBinding {
    fn into_binding(self) -> HandlerBinding {
        self
    }
}

impl<F> IntoHandlerBinding<()> for F
where
    F: Fn(&dyn ExecutionContext) -> HandlerResult + Send + Sync + 'static,
{
    fn into_binding(self) -> HandlerBinding {
        HandlerBinding::Fast(Arc::new(self))
    }
}

/// Pull the next positional value and unpack it as `T`.
fn take<T: Any>(
    values: &mut std::vec::IntoIter<ArgValue>,
    position: usize,
) -> Result<T, InvokeError> {
    let expected = type_name::<T>();
    let value = values
        .next()
        .ok_or(InvokeError::MissingArgument { position, expected })?;
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| InvokeError::ArgumentMismatch { position, expected })
}

macro_rules! impl_generic_handler {
    ($($param:ident),+) => {
        impl<F, $($param,)+> IntoHandlerBinding<($($param,)+)> for F
        where
            F: Fn(&dyn ExecutionContext, $($param,)+) -> HandlerResult + Send + Sync + 'static,
            $($param: Any + Send,)+
        {
            fn into_binding(self) -> HandlerBinding {
                let mut position = 0;
                let parameters = vec![$({
                    position += 1;
                    ParameterInfo::of::<$param>(position)
                },)+];
                let handler = self;
                HandlerBinding::Generic {
                    parameters,
                    call: Arc::new(
                        move |ctx: &dyn ExecutionContext, values: Vec<ArgValue>| -> Result<(), InvokeError> {
                            let mut values = values.into_iter();
                            let mut position = 0;
                            $(
                                position += 1;
                                #[allow(non_snake_case)]
                                let $param = take::<$param>(&mut values, position)?;
                            )+
                            handler(ctx, $($param,)+).map_err(InvokeError::Handler)
                        },
                    ),
                }
            }
        }
    };
}

impl_generic_handler!(A1);
impl_generic_handler!(A1, A2);
impl_generic_handler!(A1, A2, A3);
impl_generic_handler!(A1, A2, A3, A4);
impl_generic_handler!(A1, A2, A3, A4, A5);
impl_generic_handler!(A1, A2, A3, A4, A5, A6);
impl_generic_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_generic_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
