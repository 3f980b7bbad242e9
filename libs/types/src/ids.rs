//! Unique identifier types for ledger entities
//!
//! Accounts use UUID v7 so that identities created by a shell sort in
//! creation order. Assets are addressed by an opaque token identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an account
///
/// The ledger stores nothing about an account beyond using it as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new AccountId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a fungible token outside the ledger's own asset classes
///
/// Typically a contract address or ticker. Empty identifiers are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new AssetId
    ///
    /// # Panics
    /// Panics if the identifier is empty
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        assert!(!s.trim().is_empty(), "AssetId must not be empty");
        Self(s)
    }

    /// Try to create an AssetId, returning None if empty
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.trim().is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
