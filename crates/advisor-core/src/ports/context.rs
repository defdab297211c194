//! Execution context capability passed as the first call argument.

use serde::{Deserialize, Serialize};

use crate::domain::SandboxRealm;

/// A participant in a command call: the caller or one of its targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable identifier (e.g. a platform user id).
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Numeric rank; higher outranks lower.
    pub permission_level: u32,
}

impl Identity {
    pub fn new(id: u64, name: impl Into<String>, permission_level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            permission_level,
        }
    }
}

/// Everything a handler may need to know about the call it is serving.
///
/// Implementations hold caller identity, zero or more targets, and the realm
/// the call originates from. Handlers report results through [`reply`](Self::reply).
pub trait ExecutionContext: Send + Sync {
    /// Who issued the command.
    fn caller(&self) -> &Identity;

    /// Participants the command acts on, if any.
    fn targets(&self) -> &[Identity] {
        &[]
    }

    /// Realm the call was issued from.
    fn realm(&self) -> SandboxRealm;

    /// Send a message back to the caller.
    fn reply(&self, message: &str);
}
