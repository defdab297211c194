//! Built-in modules, commands and the demo roster.
//!
//! Registered at bootstrap. The returned modules must be kept alive by the
//! caller: commands only hold weak handles to them.

use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use advisor_core::{
    ArgumentKind, Command, CommandArgument, CommandModule, CommandRegistry, DispatchError,
    Dispatcher, ExecutionContext, HandlerResult, Identity, SandboxRealm, TargetPermission,
};

/// Participants known to the console, resolvable as command targets.
pub fn roster() -> Vec<Identity> {
    vec![
        Identity::new(1, "host", 100),
        Identity::new(2, "mara", 50),
        Identity::new(3, "bob", 10),
        Identity::new(4, "eve", 10),
    ]
}

/// Register every built-in command and return the modules that own them.
pub fn register_builtins(dispatcher: &Dispatcher) -> Result<Vec<Arc<CommandModule>>, DispatchError> {
    let general = Arc::new(CommandModule::new("General").with_category("General"));
    let moderation = Arc::new(
        CommandModule::new("Moderation")
            .with_prefix("mod")
            .with_category("Moderation"),
    );
    let utility = Arc::new(CommandModule::new("Utility").with_prefix("calc"));

    let registry = Arc::downgrade(dispatcher.registry());

    let commands = [
        help_command(&general, registry.clone()),
        complete_command(&general, registry),
        Command::builder("ping")
            .module(&general)
            .description("Check that the console is responding")
            .realm(SandboxRealm::Shared)
            .handler(ping)
            .build(),
        Command::builder("whoami")
            .module(&general)
            .description("Show who you are running as")
            .realm(SandboxRealm::Shared)
            .handler(whoami)
            .build(),
        Command::builder("echo")
            .module(&general)
            .alias("say")
            .description("Repeat a message back")
            .realm(SandboxRealm::Shared)
            .argument(CommandArgument::new("message", ArgumentKind::Remainder).describe("Text to repeat"))
            .handler(|ctx: &dyn ExecutionContext, message: String| {
                ctx.reply(&message);
                Ok(())
            })
            .build(),
        Command::builder("kick")
            .module(&moderation)
            .alias("kick")
            .description("Remove a player from the session")
            .target_permission(TargetPermission::Lower)
            .argument(CommandArgument::new("player", ArgumentKind::Target).describe("Player to kick"))
            .argument(
                CommandArgument::new("reason", ArgumentKind::Remainder)
                    .describe("Shown to the kicked player")
                    .optional(Some("No reason given")),
            )
            .handler(|ctx: &dyn ExecutionContext, player: Identity, reason: String| {
                ctx.reply(&format!("Kicked {} ({reason})", player.name));
                Ok(())
            })
            .build(),
        Command::builder("slap")
            .module(&moderation)
            .alias("slap")
            .description("Slap a player for some damage")
            .target_permission(TargetPermission::LowerOrEqual)
            .argument(CommandArgument::new("player", ArgumentKind::Target))
            .argument(CommandArgument::new("damage", ArgumentKind::Integer).optional(Some("10")))
            .handler(slap)
            .build(),
        Command::builder("menu")
            .module(&moderation)
            .description("Open the moderation menu")
            .realm(SandboxRealm::Client)
            .handler(|ctx: &dyn ExecutionContext| {
                ctx.reply("Opening moderation menu");
                Ok(())
            })
            .build(),
        Command::builder("add")
            .module(&utility)
            .description("Add two numbers")
            .realm(SandboxRealm::Shared)
            .argument(CommandArgument::new("a", ArgumentKind::Float))
            .argument(CommandArgument::new("b", ArgumentKind::Float))
            .handler(|ctx: &dyn ExecutionContext, a: f64, b: f64| {
                ctx.reply(&format!("{}", a + b));
                Ok(())
            })
            .build(),
    ];

    for command in commands {
        dispatcher.register(command)?;
    }

    Ok(vec![general, moderation, utility])
}

fn ping(ctx: &dyn ExecutionContext) -> HandlerResult {
    ctx.reply("pong");
    Ok(())
}

fn whoami(ctx: &dyn ExecutionContext) -> HandlerResult {
    let caller = ctx.caller();
    ctx.reply(&format!(
        "{} (id {}, level {}) on the {} realm",
        caller.name,
        caller.id,
        caller.permission_level,
        ctx.realm()
    ));
    Ok(())
}

fn slap(ctx: &dyn ExecutionContext, player: Identity, damage: i64) -> HandlerResult {
    if damage < 0 {
        anyhow::bail!("Damage cannot be negative");
    }
    ctx.reply(&format!("{} slapped {} for {damage} damage", ctx.caller().name, player.name));
    Ok(())
}

fn help_command(module: &Arc<CommandModule>, registry: Weak<RwLock<CommandRegistry>>) -> Command {
    Command::builder("help")
        .module(module)
        .alias("?")
        .description("List commands, or show details for one")
        .realm(SandboxRealm::Shared)
        .argument(CommandArgument::new("command", ArgumentKind::Remainder).optional(None))
        .handler(move |ctx: &dyn ExecutionContext, name: String| -> HandlerResult {
            let Some(registry) = registry.upgrade() else {
                anyhow::bail!("Command registry is no longer available");
            };
            let registry = registry.read().unwrap_or_else(PoisonError::into_inner);
            if name.trim().is_empty() {
                ctx.reply(&list_all(&registry));
                return Ok(());
            }
            let Some(command) = registry.find(&name) else {
                anyhow::bail!("Unknown command: {name}");
            };
            ctx.reply(&describe(&command));
            Ok(())
        })
        .build()
}

fn complete_command(module: &Arc<CommandModule>, registry: Weak<RwLock<CommandRegistry>>) -> Command {
    Command::builder("complete")
        .module(module)
        .description("Suggest command names for a prefix")
        .hidden(true)
        .realm(SandboxRealm::Shared)
        .argument(CommandArgument::new("prefix", ArgumentKind::Remainder).optional(None))
        .handler(move |ctx: &dyn ExecutionContext, prefix: String| -> HandlerResult {
            let Some(registry) = registry.upgrade() else {
                anyhow::bail!("Command registry is no longer available");
            };
            let suggestions = registry
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .complete(&prefix);
            ctx.reply(&suggestions.join(" "));
            Ok(())
        })
        .build()
}

fn list_all(registry: &CommandRegistry) -> String {
    let mut out = String::from("Available commands:");
    for (category, commands) in registry.by_category() {
        let _ = write!(out, "\n\n[{category}]");
        for command in commands {
            let _ = write!(out, "\n  {:32} {}", command.usage(), command.description());
        }
    }
    out.push_str("\n\nType 'help <command>' for details.");
    out
}

fn describe(command: &Command) -> String {
    let mut out = format!("Command: {}", command.full_name());
    if !command.aliases().is_empty() {
        let _ = write!(out, " (aliases: {})", command.aliases().join(", "));
    }
    let _ = write!(out, "\nUsage: {}", command.usage());
    let _ = write!(out, "\nCategory: {}", command.category());
    let _ = write!(out, "\nRealm: {}", command.execution_realm());
    if !command.description().is_empty() {
        let _ = write!(out, "\n{}", command.description());
    }
    for argument in command.arguments() {
        let _ = write!(out, "\n  {:24} {}", argument.usage(), argument.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{BindingKind, LevelPermissionGate};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Arc::new(RwLock::new(CommandRegistry::default())),
            SandboxRealm::Server,
            Arc::new(LevelPermissionGate),
        )
    }

    #[test]
    fn test_register_builtins() {
        let dispatcher = dispatcher();
        let modules = register_builtins(&dispatcher).unwrap();
        assert_eq!(modules.len(), 3);

        let registry = dispatcher.read_registry();
        assert_eq!(registry.find("mod kick").unwrap().category(), "Moderation");
        assert_eq!(registry.find("calc add").unwrap().category(), "Uncategorized");
        assert_eq!(registry.find("say").unwrap().full_name(), "echo");
        assert_eq!(registry.find("ping").unwrap().binding_kind(), Some(BindingKind::Fast));
        assert_eq!(registry.find("kick").unwrap().binding_kind(), Some(BindingKind::Generic));
    }

    #[test]
    fn test_declared_arguments_match_handlers() {
        let dispatcher = dispatcher();
        let _modules = register_builtins(&dispatcher).unwrap();
        for command in dispatcher.read_registry().commands() {
            assert_eq!(
                command.arguments().len(),
                command.parameters().len(),
                "{}",
                command.full_name()
            );
            assert!(command.parameter_mismatches().is_empty(), "{}", command.full_name());
        }
    }

    #[test]
    fn test_roster_names_unique() {
        let roster = roster();
        for (i, a) in roster.iter().enumerate() {
            assert!(roster[i + 1..].iter().all(|b| !a.name.eq_ignore_ascii_case(&b.name)));
        }
    }
}
