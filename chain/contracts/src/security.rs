//! Authorization seam for privileged operations
//!
//! The custody core only ever asks one question: does this caller hold
//! capability C? `Authorizer` is that question; `AccessControl` is the
//! role-table answer shipped with the crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Privileges consulted by the custody core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Overwrite balances directly
    Recovery,
    /// Read balances of accounts other than the caller's
    InspectBalances,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Recovery => f.write_str("recovery"),
            Capability::InspectBalances => f.write_str("inspect_balances"),
        }
    }
}

/// Any authorization backend (role table, capability tokens, ACL).
pub trait Authorizer: Send + Sync {
    fn has_capability(&self, caller: &str, capability: Capability) -> bool;
}

/// Access control roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Holds every capability
    Admin,
    /// Support staff: may inspect balances, may not recover
    Operator,
    /// Regular user
    User,
}

impl Role {
    pub fn grants(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Operator => capability == Capability::InspectBalances,
            Role::User => false,
        }
    }
}

/// Fixed role table: caller name to role.
///
/// Roles are assigned while wiring the vault; nothing rotates them at
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    roles: HashMap<String, Role>,
}

impl AccessControl {
    /// Role table with `admin` as the only entry.
    pub fn new(admin: impl Into<String>) -> Self {
        let mut roles = HashMap::new();
        roles.insert(admin.into(), Role::Admin);
        Self { roles }
    }

    /// Assign `role` to `caller`, replacing any earlier role.
    pub fn grant_role(&mut self, caller: impl Into<String>, role: Role) {
        self.roles.insert(caller.into(), role);
    }
}

impl Authorizer for AccessControl {
    fn has_capability(&self, caller: &str, capability: Capability) -> bool {
        self.roles
            .get(caller)
            .map_or(false, |role| role.grants(capability))
    }
}
