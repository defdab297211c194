//! Dispatcher - resolves, authorizes and invokes commands.
//!
//! Sequence for every call:
//! 1. Look the command up by full name or alias
//! 2. Check its execution realm against the host realm
//! 3. Check the declared target permission for each context target and
//!    each bound `Identity` argument
//! 4. Build the call sequence `[context, args..]` and invoke
//!
//! The registry lock is released before step 4 so long-running handlers never
//! block registration, and so handlers may read the registry themselves.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use thiserror::Error;
use tracing::{debug, warn};

use super::registry::{CommandRegistry, RegistryError};
use crate::domain::{Command, SandboxRealm};
use crate::engine::{ArgValue, CallArg, InvokeError};
use crate::ports::{ExecutionContext, Identity, PermissionGate};

/// Registry handle shared between the dispatcher and anything that lists
/// commands.
pub type SharedRegistry = Arc<RwLock<CommandRegistry>>;

/// Errors from [`Dispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Command '{command}' must run on the {required} realm, this host is {host}")]
    WrongRealm {
        command: String,
        required: SandboxRealm,
        host: SandboxRealm,
    },

    #[error("You are not allowed to use '{command}' on {target}")]
    PermissionDenied { command: String, target: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

/// Routes calls to registered commands.
pub struct Dispatcher {
    registry: SharedRegistry,
    host_realm: SandboxRealm,
    gate: Arc<dyn PermissionGate>,
}

impl Dispatcher {
    pub fn new(registry: SharedRegistry, host_realm: SandboxRealm, gate: Arc<dyn PermissionGate>) -> Self {
        Self {
            registry,
            host_realm,
            gate,
        }
    }

    pub const fn host_realm(&self) -> SandboxRealm {
        self.host_realm
    }

    /// The shared registry handle.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Read access to the registry.
    pub fn read_registry(&self) -> RwLockReadGuard<'_, CommandRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, command: impl Into<Arc<Command>>) -> Result<Arc<Command>, DispatchError> {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        Ok(registry.register(command)?)
    }

    pub fn unregister(&self, full_name: &str) -> Result<Arc<Command>, DispatchError> {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        Ok(registry.unregister(full_name)?)
    }

    /// Look up a command by full name or alias.
    pub fn resolve(&self, name: &str) -> Result<Arc<Command>, DispatchError> {
        self.read_registry()
            .find(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))
    }

    /// Realm and permission checks, without invoking.
    ///
    /// The target rule applies to every context target and to every
    /// [`Identity`] among `args`, so a caller cannot skip the check by
    /// leaving the context's targets empty.
    pub fn authorize(
        &self,
        command: &Command,
        ctx: &dyn ExecutionContext,
        args: &[ArgValue],
    ) -> Result<(), DispatchError> {
        let required = command.execution_realm();
        if !required.accepts(self.host_realm) {
            warn!(
                command = %command.full_name(),
                required = %required,
                host = %self.host_realm,
                "Command rejected: wrong realm"
            );
            return Err(DispatchError::WrongRealm {
                command: command.full_name().to_string(),
                required,
                host: self.host_realm,
            });
        }

        let Some(rule) = command.target_permission() else {
            return Ok(());
        };
        let caller = ctx.caller();
        let bound_targets = args.iter().filter_map(|value| (**value).downcast_ref::<Identity>());
        if let Some(target) = ctx
            .targets()
            .iter()
            .chain(bound_targets)
            .find(|target| !self.gate.can_target(caller, target, rule))
        {
            warn!(
                command = %command.full_name(),
                caller = %caller.name,
                target = %target.name,
                rule = ?rule,
                "Command rejected: insufficient permission"
            );
            return Err(DispatchError::PermissionDenied {
                command: command.full_name().to_string(),
                target: target.name.clone(),
            });
        }
        Ok(())
    }

    /// Resolve, authorize and invoke `name` with already-bound `args`.
    pub fn dispatch(
        &self,
        name: &str,
        ctx: Arc<dyn ExecutionContext>,
        args: Vec<ArgValue>,
    ) -> Result<(), DispatchError> {
        let command = self.resolve(name)?;
        self.execute(&command, ctx, args)
    }

    /// Authorize and invoke an already-resolved command.
    pub fn execute(
        &self,
        command: &Command,
        ctx: Arc<dyn ExecutionContext>,
        args: Vec<ArgValue>,
    ) -> Result<(), DispatchError> {
        self.authorize(command, ctx.as_ref(), &args)?;

        debug!(
            command = %command.full_name(),
            caller = %ctx.caller().name,
            args = args.len(),
            "Dispatching command"
        );

        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(CallArg::Context(ctx));
        call_args.extend(args.into_iter().map(CallArg::Value));
        command.invoke(call_args)?;
        Ok(())
    }
}
