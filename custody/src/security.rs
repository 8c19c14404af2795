//! Shared security primitives for engine components
//!
//! Provides the reentrancy guard, role-based access control, and pause
//! circuit breaker used by both the token ledger and the custody vault.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use types::ids::PrincipalId;

/// Reentrancy guard preventing nested calls into protected operations.
///
/// An entry point acquires the guard before running any of its checks and
/// releases it on every exit path. While an operation is suspended inside
/// an external invocation, any call back into a guarded entry point finds
/// the depth non-zero and is rejected.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    depth: u32,
}

impl ReentrancyGuard {
    /// Create a new guard at depth zero.
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if the depth is already non-zero (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.depth != 0 {
            return false;
        }
        self.depth = 1;
        true
    }

    /// Release the guard, returning the depth to zero.
    pub fn release(&mut self) {
        self.depth = 0;
    }

    /// Check if an invocation is currently on the stack.
    pub fn is_entered(&self) -> bool {
        self.depth != 0
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full system control: pause, role management, external calls, drains
    Admin,
    /// May increase total supply
    Minter,
}

/// Role-based access control registry.
///
/// Membership is a plain role → principal-set map queried by a pure
/// predicate; there is no role hierarchy. The creating principal is
/// bootstrapped into `Admin` at construction, and the `Admin` set can
/// never be emptied afterwards.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: HashMap<Role, HashSet<PrincipalId>>,
}

impl AccessControl {
    /// Create a registry with an initial administrator.
    pub fn new(admin: PrincipalId) -> Self {
        let mut roles: HashMap<Role, HashSet<PrincipalId>> = HashMap::new();
        roles.entry(Role::Admin).or_default().insert(admin);
        Self { roles }
    }

    /// Check if a principal holds the specified role. Pure read.
    pub fn has(&self, role: Role, principal: &PrincipalId) -> bool {
        self.roles
            .get(&role)
            .map_or(false, |members| members.contains(principal))
    }

    /// Check if a principal is an administrator.
    pub fn is_admin(&self, principal: &PrincipalId) -> bool {
        self.has(Role::Admin, principal)
    }

    /// Grant a role. Only an administrator can grant.
    /// Returns `true` on success.
    pub fn grant(&mut self, caller: &PrincipalId, role: Role, principal: PrincipalId) -> bool {
        if !self.is_admin(caller) {
            return false;
        }
        self.roles.entry(role).or_default().insert(principal);
        true
    }

    /// Revoke a role. Only an administrator can revoke, and the last
    /// administrator cannot be removed.
    /// Returns `true` on success.
    pub fn revoke(&mut self, caller: &PrincipalId, role: Role, principal: &PrincipalId) -> bool {
        if !self.is_admin(caller) {
            return false;
        }
        if role == Role::Admin && self.member_count(Role::Admin) == 1 && self.is_admin(principal) {
            return false;
        }
        self.roles
            .get_mut(&role)
            .map_or(false, |members| members.remove(principal))
    }

    /// Number of principals holding a role.
    pub fn member_count(&self, role: Role) -> usize {
        self.roles.get(&role).map_or(0, |members| members.len())
    }
}

/// Pause circuit breaker.
///
/// When paused, value-moving operations must be rejected before any other
/// check runs. Read-only queries are unaffected.
#[derive(Debug, Clone)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    /// Create a new switch in the active state.
    pub fn new() -> Self {
        Self { paused: false }
    }

    /// Halt value-moving operations.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume normal operation.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PauseSwitch {
    fn default() -> Self {
        Self::new()
    }
}
