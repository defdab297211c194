//! Permission gate port.

use crate::domain::TargetPermission;

use super::Identity;

/// Decides whether a caller may act on a target under a declared rule.
///
/// The dispatcher consults the gate before invoking any command that declares
/// a [`TargetPermission`]; the invocation engine itself never does.
pub trait PermissionGate: Send + Sync {
    fn can_target(&self, caller: &Identity, target: &Identity, rule: TargetPermission) -> bool;
}

/// Compares `permission_level` numerically. Callers may always target
/// themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPermissionGate;

impl PermissionGate for LevelPermissionGate {
    fn can_target(&self, caller: &Identity, target: &Identity, rule: TargetPermission) -> bool {
        if caller.id == target.id {
            return true;
        }
        match rule {
            TargetPermission::Lower => target.permission_level < caller.permission_level,
            TargetPermission::LowerOrEqual => target.permission_level <= caller.permission_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::new(1, "admin", 50)
    }

    #[test]
    fn test_lower_rule_is_strict() {
        let gate = LevelPermissionGate;
        let peer = Identity::new(2, "peer", 50);
        let guest = Identity::new(3, "guest", 0);
        assert!(gate.can_target(&admin(), &guest, TargetPermission::Lower));
        assert!(!gate.can_target(&admin(), &peer, TargetPermission::Lower));
        assert!(gate.can_target(&admin(), &peer, TargetPermission::LowerOrEqual));
    }

    #[test]
    fn test_self_target_always_allowed() {
        let gate = LevelPermissionGate;
        assert!(gate.can_target(&admin(), &admin(), TargetPermission::Lower));
    }
}
