//! Command registry - lookup by full name and alias.
//!
//! The registry owns every registered [`Command`] behind an `Arc` and indexes
//! it under its full name and each alias. Registration is all-or-nothing: a
//! command whose keys collide with an existing entry is rejected without
//! touching the index.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::Command;
use crate::settings::Settings;

/// Errors from registry mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The command has no handler binding and could never be invoked.
    #[error("Command '{0}' has no handler binding")]
    Unbound(String),

    /// A name or alias is already taken.
    #[error("'{key}' is already registered by command '{existing}'")]
    Conflict { key: String, existing: String },

    /// No command is registered under that full name.
    #[error("No command registered as '{0}'")]
    NotFound(String),
}

/// Registered commands indexed by full name and alias.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
    index: HashMap<String, Arc<Command>>,
    case_insensitive: bool,
    show_hidden: bool,
    max_completions: usize,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(&Settings::with_defaults())
    }
}

impl CommandRegistry {
    /// Create an empty registry configured from `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            case_insensitive: settings.effective_case_insensitive_lookup(),
            show_hidden: settings.effective_show_hidden(),
            max_completions: settings.effective_max_completions(),
        }
    }

    fn key(&self, name: &str) -> String {
        let name = name.trim();
        if self.case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Normalized keys for a command: full name first, then aliases, without
    /// duplicates.
    fn keys_for(&self, command: &Command) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(command.aliases().len() + 1);
        for name in std::iter::once(command.full_name()).chain(command.aliases().iter().map(String::as_str)) {
            let key = self.key(name);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Register a command under its full name and aliases.
    pub fn register(&mut self, command: impl Into<Arc<Command>>) -> Result<Arc<Command>, RegistryError> {
        let command = command.into();
        if !command.is_bound() {
            return Err(RegistryError::Unbound(command.full_name().to_string()));
        }

        let keys = self.keys_for(&command);
        if let Some((key, existing)) = keys
            .iter()
            .find_map(|key| self.index.get(key).map(|existing| (key, existing)))
        {
            return Err(RegistryError::Conflict {
                key: key.clone(),
                existing: existing.full_name().to_string(),
            });
        }

        for key in keys {
            self.index.insert(key, Arc::clone(&command));
        }
        self.commands.push(Arc::clone(&command));
        debug!(
            command = %command.full_name(),
            aliases = command.aliases().len(),
            category = %command.category(),
            "Registered command"
        );
        Ok(command)
    }

    /// Remove a command and all of its alias keys.
    pub fn unregister(&mut self, full_name: &str) -> Result<Arc<Command>, RegistryError> {
        let key = self.key(full_name);
        let command = self
            .index
            .get(&key)
            .filter(|command| self.key(command.full_name()) == key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(full_name.to_string()))?;

        for key in self.keys_for(&command) {
            self.index.remove(&key);
        }
        self.commands.retain(|existing| !Arc::ptr_eq(existing, &command));
        debug!(command = %command.full_name(), "Unregistered command");
        Ok(command)
    }

    /// Find a command by full name or alias.
    pub fn find(&self, name: &str) -> Option<Arc<Command>> {
        self.index.get(&self.key(name)).cloned()
    }

    /// All commands, in registration order.
    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    /// Commands shown on discovery surfaces.
    pub fn visible(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands
            .iter()
            .filter(|command| self.show_hidden || !command.is_hidden())
    }

    /// Visible commands grouped by category, categories sorted.
    pub fn by_category(&self) -> BTreeMap<String, Vec<Arc<Command>>> {
        let mut groups: BTreeMap<String, Vec<Arc<Command>>> = BTreeMap::new();
        for command in self.visible() {
            groups
                .entry(command.category())
                .or_default()
                .push(Arc::clone(command));
        }
        groups
    }

    /// Autocomplete: visible full names and aliases starting with `prefix`.
    ///
    /// Sorted, deduplicated, capped at the configured limit.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix = self.key(prefix);
        let mut matches: Vec<String> = self
            .visible()
            .flat_map(|command| {
                std::iter::once(command.full_name().to_string()).chain(command.aliases().iter().cloned())
            })
            .filter(|candidate| self.key(candidate).starts_with(&prefix))
            .collect();
        matches.sort();
        matches.dedup();
        matches.truncate(self.max_completions);
        matches
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandModule;
    use crate::engine::HandlerResult;
    use crate::ports::ExecutionContext;

    fn noop(_: &dyn ExecutionContext) -> HandlerResult {
        Ok(())
    }

    fn command(name: &str, aliases: &[&str]) -> Command {
        Command::builder(name)
            .aliases(aliases.iter().copied())
            .handler(noop)
            .build()
    }

    #[test]
    fn test_find_by_name_and_alias() {
        let mut registry = CommandRegistry::default();
        registry.register(command("teleport", &["tp", "goto"])).unwrap();

        assert_eq!(registry.find("teleport").unwrap().full_name(), "teleport");
        assert_eq!(registry.find("tp").unwrap().full_name(), "teleport");
        assert_eq!(registry.find("GOTO").unwrap().full_name(), "teleport");
        assert!(registry.find("warp").is_none());
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let settings = Settings {
            case_insensitive_lookup: Some(false),
            ..Settings::with_defaults()
        };
        let mut registry = CommandRegistry::new(&settings);
        registry.register(command("Ping", &[])).unwrap();
        assert!(registry.find("Ping").is_some());
        assert!(registry.find("ping").is_none());
    }

    #[test]
    fn test_rejects_unbound_command() {
        let mut registry = CommandRegistry::default();
        let unbound = Command::builder("ghost").build();
        assert_eq!(
            registry.register(unbound).unwrap_err(),
            RegistryError::Unbound("ghost".to_string())
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_conflict_leaves_index_untouched() {
        let mut registry = CommandRegistry::default();
        registry.register(command("kick", &["boot"])).unwrap();

        let err = registry.register(command("eject", &["yeet", "Boot"])).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Conflict {
                key: "boot".to_string(),
                existing: "kick".to_string(),
            }
        );
        assert!(registry.find("eject").is_none());
        assert!(registry.find("yeet").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_padded_alias_is_found() {
        let mut registry = CommandRegistry::default();
        registry.register(command(" ping ", &[" pong"])).unwrap();
        assert_eq!(registry.find("pong").unwrap().full_name(), " ping ");
        assert!(registry.find(" pong").is_some());
        assert!(registry.find("ping").is_some());
        assert!(matches!(
            registry.register(command("pong", &[])),
            Err(RegistryError::Conflict { .. })
        ));
        registry.unregister("ping").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_alias_equal_to_own_name_is_not_a_conflict() {
        let mut registry = CommandRegistry::default();
        registry.register(command("help", &["HELP", "?"])).unwrap();
        assert_eq!(registry.find("?").unwrap().full_name(), "help");
    }

    #[test]
    fn test_unregister_removes_aliases() {
        let mut registry = CommandRegistry::default();
        registry.register(command("teleport", &["tp"])).unwrap();
        registry.register(command("ping", &[])).unwrap();

        let removed = registry.unregister("teleport").unwrap();
        assert_eq!(removed.full_name(), "teleport");
        assert!(registry.find("tp").is_none());
        assert_eq!(registry.len(), 1);

        registry.register(command("tp", &[])).unwrap();
        assert_eq!(registry.find("tp").unwrap().full_name(), "tp");
    }

    #[test]
    fn test_unregister_by_alias_is_not_found() {
        let mut registry = CommandRegistry::default();
        registry.register(command("teleport", &["tp"])).unwrap();
        assert_eq!(
            registry.unregister("tp").unwrap_err(),
            RegistryError::NotFound("tp".to_string())
        );
    }

    #[test]
    fn test_hidden_commands_excluded_from_discovery() {
        let mut registry = CommandRegistry::default();
        registry.register(command("ping", &[])).unwrap();
        registry
            .register(Command::builder("debugdump").hidden(true).handler(noop).build())
            .unwrap();

        let visible: Vec<_> = registry.visible().map(|c| c.full_name().to_string()).collect();
        assert_eq!(visible, vec!["ping".to_string()]);
        assert!(registry.complete("de").is_empty());
        assert!(registry.find("debugdump").is_some());
    }

    #[test]
    fn test_show_hidden_setting() {
        let settings = Settings {
            show_hidden: Some(true),
            ..Settings::with_defaults()
        };
        let mut registry = CommandRegistry::new(&settings);
        registry
            .register(Command::builder("debugdump").hidden(true).handler(noop).build())
            .unwrap();
        assert_eq!(registry.visible().count(), 1);
    }

    #[test]
    fn test_by_category_groups_and_sorts() {
        let moderation = Arc::new(CommandModule::new("Moderation").with_category("Moderation"));
        let fun = Arc::new(CommandModule::new("Fun").with_category("Fun"));
        let mut registry = CommandRegistry::default();
        registry
            .register(Command::builder("kick").module(&moderation).handler(noop).build())
            .unwrap();
        registry
            .register(Command::builder("slap").module(&fun).handler(noop).build())
            .unwrap();
        registry.register(command("ping", &[])).unwrap();

        let groups = registry.by_category();
        let names: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(names, vec!["Fun", "Moderation", "Uncategorized"]);
        assert_eq!(groups["Moderation"][0].full_name(), "kick");
    }

    #[test]
    fn test_complete_sorted_and_capped() {
        let settings = Settings {
            max_completions: Some(2),
            ..Settings::with_defaults()
        };
        let mut registry = CommandRegistry::new(&settings);
        registry.register(command("teleport", &["tp"])).unwrap();
        registry.register(command("tphere", &[])).unwrap();
        registry.register(command("time", &[])).unwrap();

        assert_eq!(registry.complete("T"), vec!["teleport".to_string(), "time".to_string()]);
        assert_eq!(registry.complete("tp"), vec!["tp".to_string(), "tphere".to_string()]);
    }
}
