//! Core domain types.
//!
//! # Structure
//!
//! - `command` - The command descriptor (`Command`) and its builder
//! - `module` - Command modules (`CommandModule`)
//! - `argument` - Declared argument descriptors (`CommandArgument`)
//! - `realm` - Realm and target-permission flags

mod argument;
mod command;
mod module;
mod realm;

pub use argument::{ArgumentKind, CommandArgument};
pub use command::{Command, CommandBuilder, CommandInfo, UNCATEGORIZED};
pub use module::CommandModule;
pub use realm::{ParseRealmError, SandboxRealm, TargetPermission};
