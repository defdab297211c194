//! Command descriptor and its builder.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use super::{CommandArgument, CommandModule, SandboxRealm, TargetPermission};
use crate::engine::{BindingKind, CallArg, HandlerBinding, IntoHandlerBinding, InvokeError, ParameterInfo};
use crate::ports::ExecutionContext;

/// Category reported for commands whose module is gone or has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A registered command.
///
/// Built in one step by [`CommandBuilder`] and immutable afterwards. Every
/// field is a read-only view; [`invoke`](Self::invoke) is the only way to run
/// the handler.
#[derive(Debug)]
pub struct Command {
    name: String,
    full_name: String,
    aliases: Vec<String>,
    description: String,
    is_hidden: bool,
    target_permission: Option<TargetPermission>,
    execution_realm: SandboxRealm,
    parent_module: Option<Weak<CommandModule>>,
    arguments: Vec<CommandArgument>,
    binding: Option<HandlerBinding>,
}

impl Command {
    /// Start building a command called `name`.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// Name of the command, unique within its module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name qualified with the module prefix, e.g. `permissions list`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether discovery and autocomplete surfaces should skip this command.
    pub const fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub const fn target_permission(&self) -> Option<TargetPermission> {
        self.target_permission
    }

    pub const fn execution_realm(&self) -> SandboxRealm {
        self.execution_realm
    }

    /// The owning module, if it is still alive.
    pub fn parent_module(&self) -> Option<Arc<CommandModule>> {
        self.parent_module.as_ref().and_then(Weak::upgrade)
    }

    /// The module's category, or [`UNCATEGORIZED`] when there is no module or
    /// its category is blank. Re-read from the module on every call.
    pub fn category(&self) -> String {
        self.parent_module()
            .map(|module| module.category())
            .filter(|category| !category.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }

    /// Declared arguments, in declaration order.
    pub fn arguments(&self) -> &[CommandArgument] {
        &self.arguments
    }

    /// Calling convention of the bound handler, `None` if unbound.
    pub fn binding_kind(&self) -> Option<BindingKind> {
        self.binding.as_ref().map(HandlerBinding::kind)
    }

    /// Declared handler parameters after the context.
    pub fn parameters(&self) -> &[ParameterInfo] {
        match &self.binding {
            Some(binding) => binding.parameters(),
            None => &[],
        }
    }

    /// Number of handler parameters after the context.
    pub fn arity(&self) -> usize {
        self.parameters().len()
    }

    /// Positions whose handler parameter type differs from the type the
    /// declared argument kind binds to.
    ///
    /// Only generic bindings are compared, and only up to the shorter of the
    /// two lists.
    pub fn parameter_mismatches(&self) -> Vec<usize> {
        self.parameters()
            .iter()
            .zip(&self.arguments)
            .filter(|(parameter, argument)| parameter.type_name != argument.kind.bound_type_name())
            .map(|(parameter, _)| parameter.position)
            .collect()
    }

    pub const fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Usage line: full name followed by each argument's usage fragment.
    pub fn usage(&self) -> String {
        self.arguments
            .iter()
            .fold(self.full_name.clone(), |mut usage, argument| {
                usage.push(' ');
                usage.push_str(&argument.usage());
                usage
            })
    }

    /// Run the handler.
    ///
    /// `call_args[0]` must be the execution context, either as
    /// [`CallArg::Context`] or erased by [`CallArg::into_value`]; the remaining slots are
    /// the bound argument values in declaration order. A generic binding
    /// receives every remaining slot positionally. A fast binding receives
    /// the context only and ignores trailing slots.
    ///
    /// No arity or type check happens here: a sequence that does not fit the
    /// handler signature is a defect of whoever built it. Handler errors come
    /// back as [`InvokeError::Handler`] without modification.
    pub fn invoke(&self, call_args: Vec<CallArg>) -> Result<(), InvokeError> {
        let mut call_args = call_args.into_iter();
        let ctx = match call_args.next() {
            Some(CallArg::Context(ctx)) => ctx,
            Some(CallArg::Value(value)) => match value.downcast::<Arc<dyn ExecutionContext>>() {
                Ok(ctx) => *ctx,
                Err(_) => {
                    return Err(InvokeError::InvalidArgument(
                        "the first call argument must be an execution context".to_string(),
                    ));
                }
            },
            None => {
                return Err(InvokeError::InvalidArgument(
                    "call arguments must start with an execution context, got none".to_string(),
                ));
            }
        };

        match &self.binding {
            Some(HandlerBinding::Generic { call, .. }) => {
                call(ctx.as_ref(), call_args.map(CallArg::into_value).collect())
            }
            Some(HandlerBinding::Fast(call)) => call(ctx.as_ref()).map_err(InvokeError::Handler),
            None => Err(InvokeError::InvalidState(format!(
                "command '{}' has no handler binding",
                self.full_name
            ))),
        }
    }

    /// Serializable snapshot for help and autocomplete surfaces.
    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            name: self.name.clone(),
            full_name: self.full_name.clone(),
            aliases: self.aliases.clone(),
            description: self.description.clone(),
            is_hidden: self.is_hidden,
            target_permission: self.target_permission,
            execution_realm: self.execution_realm,
            module: self.parent_module().map(|module| module.name().to_string()),
            category: self.category(),
            arguments: self.arguments.clone(),
            binding: self.binding_kind(),
            usage: self.usage(),
        }
    }
}

/// Read-only metadata of a command, as shown to discovery UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInfo {
    pub name: String,
    pub full_name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub is_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_permission: Option<TargetPermission>,
    pub execution_realm: SandboxRealm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub category: String,
    pub arguments: Vec<CommandArgument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<BindingKind>,
    pub usage: String,
}

/// Assembles a [`Command`] in one step.
///
/// `full_name` defaults to the name qualified by the parent module's prefix.
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    full_name: Option<String>,
    aliases: Vec<String>,
    description: String,
    is_hidden: bool,
    target_permission: Option<TargetPermission>,
    execution_realm: SandboxRealm,
    parent_module: Option<Arc<CommandModule>>,
    arguments: Vec<CommandArgument>,
    binding: Option<HandlerBinding>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: None,
            aliases: Vec::new(),
            description: String::new(),
            is_hidden: false,
            target_permission: None,
            execution_realm: SandboxRealm::default(),
            parent_module: None,
            arguments: Vec::new(),
            binding: None,
        }
    }

    /// Override the derived full name.
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = is_hidden;
        self
    }

    #[must_use]
    pub const fn target_permission(mut self, permission: TargetPermission) -> Self {
        self.target_permission = Some(permission);
        self
    }

    #[must_use]
    pub const fn realm(mut self, realm: SandboxRealm) -> Self {
        self.execution_realm = realm;
        self
    }

    /// Attach the command to a module. Only a weak handle is kept.
    #[must_use]
    pub fn module(mut self, module: &Arc<CommandModule>) -> Self {
        self.parent_module = Some(Arc::clone(module));
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: CommandArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = CommandArgument>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Bind the handler routine. The calling convention is chosen here.
    #[must_use]
    pub fn handler<Args, H>(mut self, handler: H) -> Self
    where
        H: IntoHandlerBinding<Args>,
    {
        self.binding = Some(handler.into_binding());
        self
    }

    pub fn build(self) -> Command {
        let full_name = self.full_name.unwrap_or_else(|| {
            self.parent_module
                .as_deref()
                .map_or_else(|| self.name.clone(), |module| module.qualify(&self.name))
        });

        let command = Command {
            name: self.name,
            full_name,
            aliases: self.aliases,
            description: self.description,
            is_hidden: self.is_hidden,
            target_permission: self.target_permission,
            execution_realm: self.execution_realm,
            parent_module: self.parent_module.as_ref().map(Arc::downgrade),
            arguments: self.arguments,
            binding: self.binding,
        };

        match &command.binding {
            None => tracing::warn!(command = %command.full_name, "command built without a handler binding"),
            Some(binding) if binding.kind() == BindingKind::Generic => {
                if binding.arity() != command.arguments.len() {
                    tracing::warn!(
                        command = %command.full_name,
                        declared_arguments = command.arguments.len(),
                        handler_parameters = binding.arity(),
                        "argument declarations do not match handler parameters"
                    );
                }
                for position in command.parameter_mismatches() {
                    tracing::warn!(
                        command = %command.full_name,
                        position,
                        "argument kind does not bind to the handler parameter type"
                    );
                }
            }
            Some(_) => {}
        }

        command
    }
}
