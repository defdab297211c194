//! Command descriptors and the invocation engine behind them.
//!
//! A [`Command`] is built once by [`CommandBuilder`], which binds the handler
//! routine to one of two calling conventions (see [`engine`]). At runtime the
//! [`Dispatcher`] resolves a name or alias through the [`CommandRegistry`],
//! checks realm and target permission, and calls [`Command::invoke`] with the
//! execution context followed by the already-bound argument values.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod engine;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ArgumentKind, Command, CommandArgument, CommandBuilder, CommandInfo, CommandModule,
    ParseRealmError, SandboxRealm, TargetPermission, UNCATEGORIZED,
};
pub use engine::{
    ArgValue, BindingKind, CallArg, HandlerBinding, HandlerResult, IntoHandlerBinding,
    InvokeError, ParameterInfo,
};
pub use ports::{ExecutionContext, Identity, LevelPermissionGate, PermissionGate};
pub use services::{
    CommandRegistry, DispatchError, Dispatcher, RegistryError, SharedRegistry,
};
pub use settings::{
    DEFAULT_MAX_COMPLETIONS, Settings, SettingsError, load_settings, validate_settings,
};
