//! Execution context for commands typed at the console.

use std::sync::{Mutex, PoisonError};

use advisor_core::{ExecutionContext, Identity, SandboxRealm};

/// Context for a single console line.
///
/// Replies are buffered so the caller decides where they are printed.
#[derive(Debug)]
pub struct ConsoleContext {
    caller: Identity,
    targets: Vec<Identity>,
    realm: SandboxRealm,
    replies: Mutex<Vec<String>>,
}

impl ConsoleContext {
    pub fn new(caller: Identity, targets: Vec<Identity>, realm: SandboxRealm) -> Self {
        Self {
            caller,
            targets,
            realm,
            replies: Mutex::new(Vec::new()),
        }
    }

    /// Drain buffered replies.
    pub fn take_replies(&self) -> Vec<String> {
        std::mem::take(&mut *self.replies.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ExecutionContext for ConsoleContext {
    fn caller(&self) -> &Identity {
        &self.caller
    }

    fn targets(&self) -> &[Identity] {
        &self.targets
    }

    fn realm(&self) -> SandboxRealm {
        self.realm
    }

    fn reply(&self, message: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_are_drained() {
        let ctx = ConsoleContext::new(Identity::new(1, "host", 100), vec![], SandboxRealm::Server);
        ctx.reply("one");
        ctx.reply("two");
        assert_eq!(ctx.take_replies(), vec!["one".to_string(), "two".to_string()]);
        assert!(ctx.take_replies().is_empty());
    }
}
