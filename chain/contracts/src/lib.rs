//! Custody ledger for a multi-asset vault
//!
//! Accepts deposits of a native asset, a stable token and arbitrary tokens
//! (swapped to stable on entry), keeps per-account balances, bounds total
//! custody with one capacity pool per ledger asset, and pays out
//! withdrawals under per-transaction limits priced through an oracle.
//!
//! # Modules
//! - `errors`: Error types and their flattening into [`errors::CustodyError`]
//! - `events`: Events emitted by every successful mutation
//! - `security`: Capabilities, roles and the access-control list
//! - `oracle`: Price reports and staleness validation
//! - `converter`: Native/stable unit conversion
//! - `pool`: Bounded capacity counters
//! - `ledger`: Per-account balances
//! - `policy`: Withdrawal limits
//! - `collaborators`: Traits for the price feed, custodian, swap venue and clock
//! - `config`: JSON configuration with human-readable amounts
//! - `vault`: The custody aggregate and its queries
//! - `deposit`, `withdrawal`, `recovery`: Entry points on [`vault::Vault`]
//! - `shared`: Mutex-guarded handle for concurrent callers
//! - `mocks`: In-memory collaborators for tests and simulations

pub mod collaborators;
pub mod config;
pub mod converter;
pub mod deposit;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod mocks;
pub mod oracle;
pub mod policy;
pub mod pool;
pub mod recovery;
pub mod security;
pub mod shared;
pub mod vault;
pub mod withdrawal;

pub use deposit::SwapRequest;
pub use errors::CustodyError;
pub use shared::SharedVault;
pub use vault::Vault;

/// Event schema version, bumped on any breaking change to `events`
pub const EVENT_SCHEMA_VERSION: &str = "1.0.0";
