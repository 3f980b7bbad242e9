//! Types library for the custodial ledger
//!
//! Shared vocabulary used by the custody contracts and any shell built on
//! top of them.
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, AssetId)
//! - `asset`: Asset kinds held or accepted by the ledger
//! - `units`: Decimal places and human-amount conversions

// Public modules
pub mod ids;
pub mod asset;
pub mod units;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::asset::*;
    pub use crate::units::*;
}
