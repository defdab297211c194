//! Command module: a named group of commands sharing a prefix and category.

use std::sync::{PoisonError, RwLock};

/// A group of commands.
///
/// Modules are shared behind `Arc`; commands keep only a `Weak` handle back
/// to their module so no ownership cycle exists between the two. The category
/// is interior-mutable and is re-read by [`Command::category`](super::Command::category)
/// on every call.
#[derive(Debug)]
pub struct CommandModule {
    name: String,
    prefix: Option<String>,
    category: RwLock<String>,
}

impl CommandModule {
    /// Create a module with no prefix and an empty category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            category: RwLock::new(String::new()),
        }
    }

    /// Set the prefix used to qualify command names.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the initial category.
    #[must_use]
    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self {
            category: RwLock::new(category.into()),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Current category, possibly empty.
    pub fn category(&self) -> String {
        self.category
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the category. Commands observe the change on their next
    /// `category()` call.
    pub fn set_category(&self, category: impl Into<String>) {
        *self.category.write().unwrap_or_else(PoisonError::into_inner) = category.into();
    }

    /// Qualify a command name with this module's prefix.
    ///
    /// A `list` command in a module with the `permissions` prefix becomes
    /// `permissions list`. Blank prefixes are ignored.
    pub fn qualify(&self, name: &str) -> String {
        match self.prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} {name}"),
            _ => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_with_prefix() {
        let module = CommandModule::new("Permissions").with_prefix("permissions");
        assert_eq!(module.qualify("list"), "permissions list");
    }

    #[test]
    fn test_qualify_without_prefix() {
        assert_eq!(CommandModule::new("General").qualify("ping"), "ping");
        let blank = CommandModule::new("General").with_prefix("  ");
        assert_eq!(blank.qualify("ping"), "ping");
    }

    #[test]
    fn test_set_category() {
        let module = CommandModule::new("Moderation").with_category("Admin");
        assert_eq!(module.category(), "Admin");
        module.set_category("Moderation");
        assert_eq!(module.category(), "Moderation");
    }
}
