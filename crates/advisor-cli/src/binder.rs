//! Text input binding.
//!
//! Resolves the command named at the start of a console line and converts
//! the remaining words into values of the declared argument kinds. This is a
//! whitespace splitter, not a shell parser: there is no quoting.

use std::sync::Arc;

use advisor_core::{ArgValue, ArgumentKind, Command, CommandArgument, CommandRegistry, Identity};
use thiserror::Error;

/// Errors produced while binding console input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("Nothing to run")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' to see available commands.")]
    UnknownCommand(String),

    #[error("Missing argument <{name}>. Usage: {usage}")]
    MissingArgument { name: String, usage: String },

    #[error("Argument <{name}> expects {expected}, got '{value}'")]
    InvalidValue {
        name: String,
        expected: &'static str,
        value: String,
    },

    #[error("Unknown player '{0}'")]
    UnknownTarget(String),

    #[error("Too many arguments. Usage: {usage}")]
    TooManyArguments { usage: String },
}

/// A resolved command with its bound argument values.
pub struct Invocation {
    pub command: Arc<Command>,
    /// Values in declaration order, ready to follow the context.
    pub args: Vec<ArgValue>,
    /// Participants named by `Target` arguments, in order.
    pub targets: Vec<Identity>,
}

/// Find the command named by the longest leading run of words.
///
/// Full names may contain spaces (`mod kick`), so `mod kick bob` tries
/// `mod kick bob`, then `mod kick`, then `mod`.
pub fn resolve<'a>(registry: &CommandRegistry, words: &'a [&'a str]) -> Option<(Arc<Command>, &'a [&'a str])> {
    (1..=words.len())
        .rev()
        .find_map(|n| registry.find(&words[..n].join(" ")).map(|command| (command, &words[n..])))
}

/// Resolve and bind a whole console line.
pub fn parse_line(registry: &CommandRegistry, line: &str, roster: &[Identity]) -> Result<Invocation, BindError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = words.first() else {
        return Err(BindError::Empty);
    };
    let (command, rest) = resolve(registry, &words).ok_or_else(|| BindError::UnknownCommand((*first).to_string()))?;
    let (args, targets) = bind(&command, rest, roster)?;
    Ok(Invocation {
        command,
        args,
        targets,
    })
}

/// Convert `words` into values for `command`'s declared arguments.
pub fn bind(command: &Command, words: &[&str], roster: &[Identity]) -> Result<(Vec<ArgValue>, Vec<Identity>), BindError> {
    let mut args: Vec<ArgValue> = Vec::with_capacity(command.arguments().len());
    let mut targets = Vec::new();
    let mut remaining = words;

    for argument in command.arguments() {
        let raw = if argument.kind == ArgumentKind::Remainder {
            let joined = remaining.join(" ");
            remaining = &[];
            (!joined.is_empty()).then_some(joined)
        } else if let Some((word, rest)) = remaining.split_first() {
            remaining = rest;
            Some((*word).to_string())
        } else {
            None
        };

        let raw = match raw.or_else(|| argument.default_value.clone()) {
            Some(raw) => raw,
            None if argument.is_optional => empty_value(argument),
            None => {
                return Err(BindError::MissingArgument {
                    name: argument.name.clone(),
                    usage: command.usage(),
                });
            }
        };

        if argument.kind == ArgumentKind::Target {
            let target = find_target(roster, &raw)?;
            targets.push(target.clone());
            args.push(Box::new(target));
        } else {
            args.push(convert(argument, &raw)?);
        }
    }

    if !remaining.is_empty() {
        return Err(BindError::TooManyArguments {
            usage: command.usage(),
        });
    }

    Ok((args, targets))
}

/// Text bound for an omitted optional argument with no default.
fn empty_value(argument: &CommandArgument) -> String {
    match argument.kind {
        ArgumentKind::Integer => "0".to_string(),
        ArgumentKind::Float => "0.0".to_string(),
        ArgumentKind::Boolean => "false".to_string(),
        ArgumentKind::Text | ArgumentKind::Remainder | ArgumentKind::Target => String::new(),
    }
}

fn find_target(roster: &[Identity], name: &str) -> Result<Identity, BindError> {
    roster
        .iter()
        .find(|identity| identity.name.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| BindError::UnknownTarget(name.to_string()))
}

fn convert(argument: &CommandArgument, raw: &str) -> Result<ArgValue, BindError> {
    let invalid = || BindError::InvalidValue {
        name: argument.name.clone(),
        expected: argument.kind.label(),
        value: raw.to_string(),
    };

    let value: ArgValue = match argument.kind {
        ArgumentKind::Integer => Box::new(raw.parse::<i64>().map_err(|_| invalid())?),
        ArgumentKind::Float => Box::new(raw.parse::<f64>().map_err(|_| invalid())?),
        ArgumentKind::Boolean => Box::new(parse_bool(raw).ok_or_else(invalid)?),
        ArgumentKind::Text | ArgumentKind::Remainder | ArgumentKind::Target => Box::new(raw.to_string()),
    };
    Ok(value)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{CommandModule, ExecutionContext};

    fn roster() -> Vec<Identity> {
        vec![Identity::new(1, "host", 100), Identity::new(3, "bob", 10)]
    }

    fn registry(module: &Arc<CommandModule>) -> CommandRegistry {
        let mut registry = CommandRegistry::default();
        registry
            .register(
                Command::builder("kick")
                    .module(module)
                    .argument(CommandArgument::new("player", ArgumentKind::Target))
                    .argument(CommandArgument::new("reason", ArgumentKind::Remainder).optional(Some("none")))
                    .handler(|_: &dyn ExecutionContext, _: Identity, _: String| Ok(()))
                    .build(),
            )
            .unwrap();
        registry
            .register(
                Command::builder("tune")
                    .argument(CommandArgument::new("level", ArgumentKind::Integer))
                    .argument(CommandArgument::new("ratio", ArgumentKind::Float))
                    .argument(CommandArgument::new("loud", ArgumentKind::Boolean).optional(None))
                    .handler(|_: &dyn ExecutionContext, _: i64, _: f64, _: bool| Ok(()))
                    .build(),
            )
            .unwrap();
        registry
    }

    fn module() -> Arc<CommandModule> {
        Arc::new(CommandModule::new("Moderation").with_prefix("mod"))
    }

    #[test]
    fn test_resolves_multi_word_full_name() {
        let module = module();
        let registry = registry(&module);
        let invocation = parse_line(&registry, "mod kick bob being rude", &roster()).unwrap();
        assert_eq!(invocation.command.full_name(), "mod kick");
        assert_eq!(invocation.targets, vec![Identity::new(3, "bob", 10)]);

        let mut args = invocation.args.into_iter();
        assert_eq!(*args.next().unwrap().downcast::<Identity>().unwrap(), Identity::new(3, "bob", 10));
        assert_eq!(*args.next().unwrap().downcast::<String>().unwrap(), "being rude");
    }

    #[test]
    fn test_default_applies_when_omitted() {
        let module = module();
        let registry = registry(&module);
        let invocation = parse_line(&registry, "mod kick BOB", &roster()).unwrap();
        let reason = invocation.args.into_iter().nth(1).unwrap();
        assert_eq!(*reason.downcast::<String>().unwrap(), "none");
    }

    #[test]
    fn test_typed_conversion() {
        let module = module();
        let registry = registry(&module);
        let invocation = parse_line(&registry, "tune 3 0.5 yes", &roster()).unwrap();
        let mut args = invocation.args.into_iter();
        assert_eq!(*args.next().unwrap().downcast::<i64>().unwrap(), 3);
        assert!((*args.next().unwrap().downcast::<f64>().unwrap() - 0.5).abs() < f64::EPSILON);
        assert!(*args.next().unwrap().downcast::<bool>().unwrap());
    }

    #[test]
    fn test_optional_without_default_binds_empty_value() {
        let module = module();
        let registry = registry(&module);
        let invocation = parse_line(&registry, "tune 3 0.5", &roster()).unwrap();
        let loud = invocation.args.into_iter().nth(2).unwrap();
        assert!(!*loud.downcast::<bool>().unwrap());
    }

    #[test]
    fn test_errors() {
        let module = module();
        let registry = registry(&module);
        let roster = roster();

        assert_eq!(parse_line(&registry, "   ", &roster).err(), Some(BindError::Empty));
        assert_eq!(
            parse_line(&registry, "ban bob", &roster).err(),
            Some(BindError::UnknownCommand("ban".to_string()))
        );
        assert!(matches!(
            parse_line(&registry, "mod kick", &roster).err(),
            Some(BindError::MissingArgument { ref name, .. }) if name == "player"
        ));
        assert_eq!(
            parse_line(&registry, "mod kick zed", &roster).err(),
            Some(BindError::UnknownTarget("zed".to_string()))
        );
        assert!(matches!(
            parse_line(&registry, "tune high 0.5", &roster).err(),
            Some(BindError::InvalidValue { expected: "integer", .. })
        ));
        assert!(matches!(
            parse_line(&registry, "tune 1 0.5 true extra", &roster).err(),
            Some(BindError::TooManyArguments { .. })
        ));
    }
}
