//! CLI bootstrap - the composition root.
//!
//! This module is the only place where the console is wired together:
//! - Settings file and command-line overrides
//! - Command registry and dispatcher with the level permission gate
//! - Built-in modules and commands
//! - The operator identity commands run as

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use advisor_core::{
    CommandModule, CommandRegistry, Dispatcher, Identity, LevelPermissionGate, SandboxRealm,
    Settings, load_settings, validate_settings,
};
use tracing::info;

use crate::builtin::{register_builtins, roster};
use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Optional JSON settings file.
    pub settings_path: Option<PathBuf>,
    /// Host realm override; wins over the settings file.
    pub realm: Option<SandboxRealm>,
    /// Show hidden commands; only ever turns the setting on.
    pub show_hidden: bool,
    /// Roster name commands run as.
    pub operator: String,
}

impl CliConfig {
    /// Create config with default values.
    pub fn with_defaults() -> Self {
        Self {
            settings_path: None,
            realm: None,
            show_hidden: false,
            operator: "host".to_string(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            settings_path: cli.settings.clone(),
            realm: cli.realm,
            show_hidden: cli.show_hidden,
            operator: cli.operator.clone(),
        }
    }
}

/// Fully composed console context.
pub struct CliContext {
    /// Routes command lines to registered commands.
    pub dispatcher: Dispatcher,
    /// Participants resolvable as targets.
    pub roster: Vec<Identity>,
    /// Identity commands run as.
    pub operator: Identity,
    /// Effective settings after overrides.
    pub settings: Settings,
    /// Owners of the registered commands. Commands only hold weak handles,
    /// so these must live as long as the dispatcher.
    pub modules: Vec<Arc<CommandModule>>,
}

impl CliContext {
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub const fn operator(&self) -> &Identity {
        &self.operator
    }

    pub fn roster(&self) -> &[Identity] {
        &self.roster
    }
}

/// Bootstrap the console.
///
/// 1. Load settings (file if given, otherwise defaults) and apply overrides
/// 2. Build the registry and dispatcher
/// 3. Register built-in commands
/// 4. Resolve the operator in the roster
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let mut settings = match &config.settings_path {
        Some(path) => load_settings(path)?,
        None => Settings::with_defaults(),
    };
    if let Some(realm) = config.realm {
        settings.host_realm = Some(realm);
    }
    if config.show_hidden {
        settings.show_hidden = Some(true);
    }
    validate_settings(&settings)?;

    let registry = Arc::new(RwLock::new(CommandRegistry::new(&settings)));
    let dispatcher = Dispatcher::new(
        registry,
        settings.effective_host_realm(),
        Arc::new(LevelPermissionGate),
    );
    let modules = register_builtins(&dispatcher)?;

    let roster = roster();
    let operator = roster
        .iter()
        .find(|identity| identity.name.eq_ignore_ascii_case(&config.operator))
        .cloned()
        .ok_or_else(|| CliError::Config(format!("Unknown operator '{}'", config.operator)))?;

    info!(
        realm = %dispatcher.host_realm(),
        operator = %operator.name,
        commands = dispatcher.read_registry().len(),
        "Console ready"
    );

    Ok(CliContext {
        dispatcher,
        roster,
        operator,
        settings,
        modules,
    })
}
