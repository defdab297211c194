//! Realm and target-permission flags declared on commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The runtime environment that must host a command's execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxRealm {
    /// Executed by the authoritative server.
    #[default]
    Server,
    /// Executed on the calling client.
    Client,
    /// Executable from either side.
    Shared,
}

impl SandboxRealm {
    /// Whether a host running in `host` may execute a command declared for `self`.
    pub const fn accepts(self, host: Self) -> bool {
        matches!(self, Self::Shared) || self as u8 == host as u8
    }

    /// Lowercase name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for SandboxRealm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown realm name.
#[derive(Debug, Clone, Error)]
#[error("Unknown realm '{0}' (expected server, client or shared)")]
pub struct ParseRealmError(String);

impl FromStr for SandboxRealm {
    type Err = ParseRealmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Self::Server),
            "client" => Ok(Self::Client),
            "shared" => Ok(Self::Shared),
            _ => Err(ParseRealmError(s.to_string())),
        }
    }
}

/// Level a caller must hold relative to each target of a command.
///
/// Comparison itself is performed by a [`PermissionGate`](crate::ports::PermissionGate)
/// before the command is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPermission {
    /// Targets must rank strictly below the caller.
    Lower,
    /// Targets must rank below or equal to the caller.
    LowerOrEqual,
}
