//! Declared argument descriptors.
//!
//! These describe what a command expects after its execution context. They are
//! produced by the registration step and consumed by whatever binds user input
//! into typed values; the invocation engine itself never inspects them.

use std::any::type_name;

use serde::{Deserialize, Serialize};

use crate::ports::Identity;

/// Value shape expected for an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    /// Signed integer, bound as `i64`.
    Integer,
    /// Floating point number, bound as `f64`.
    Float,
    /// `true`/`false`, bound as `bool`.
    Boolean,
    /// A single word, bound as `String`.
    Text,
    /// Everything left on the input line, bound as `String`.
    Remainder,
    /// A participant resolved by name, bound as [`Identity`].
    Target,
}

impl ArgumentKind {
    /// Short label used in usage strings.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "true|false",
            Self::Text => "text",
            Self::Remainder => "text...",
            Self::Target => "player",
        }
    }

    /// Rust type name of the value this kind binds to.
    pub fn bound_type_name(self) -> &'static str {
        match self {
            Self::Integer => type_name::<i64>(),
            Self::Float => type_name::<f64>(),
            Self::Boolean => type_name::<bool>(),
            Self::Text | Self::Remainder => type_name::<String>(),
            Self::Target => type_name::<Identity>(),
        }
    }
}

/// A single declared argument of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandArgument {
    /// Argument name shown in usage.
    pub name: String,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Expected value shape.
    pub kind: ArgumentKind,
    /// Whether the argument may be omitted.
    #[serde(default)]
    pub is_optional: bool,
    /// Raw text used when an optional argument is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl CommandArgument {
    /// Create a required argument.
    pub fn new(name: impl Into<String>, kind: ArgumentKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            is_optional: false,
            default_value: None,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the argument optional, with an optional default.
    #[must_use]
    pub fn optional(mut self, default_value: Option<&str>) -> Self {
        self.is_optional = true;
        self.default_value = default_value.map(str::to_string);
        self
    }

    /// Usage fragment: `<name:kind>` or `[name:kind]`.
    pub fn usage(&self) -> String {
        if self.is_optional {
            format!("[{}:{}]", self.name, self.kind.label())
        } else {
            format!("<{}:{}>", self.name, self.kind.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_required_and_optional() {
        let amount = CommandArgument::new("amount", ArgumentKind::Integer);
        assert_eq!(amount.usage(), "<amount:integer>");

        let reason = CommandArgument::new("reason", ArgumentKind::Remainder).optional(None);
        assert_eq!(reason.usage(), "[reason:text...]");
    }

    #[test]
    fn test_bound_type_names() {
        assert_eq!(ArgumentKind::Integer.bound_type_name(), "i64");
        assert_eq!(ArgumentKind::Remainder.bound_type_name(), ArgumentKind::Text.bound_type_name());
        assert!(ArgumentKind::Target.bound_type_name().ends_with("Identity"));
    }

    #[test]
    fn test_serialize_skips_missing_default() {
        let arg = CommandArgument::new("player", ArgumentKind::Target);
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json["kind"], "target");
        assert_eq!(json["isOptional"], false);
        assert!(json.get("defaultValue").is_none());
    }
}
