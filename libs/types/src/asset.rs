//! Asset kinds
//!
//! The ledger only ever holds two asset classes, each backed by its own
//! capacity pool. Any other token is accepted transiently on the swap path
//! and converted to the stable asset before it touches a balance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::AssetId;

/// Asset class that can carry a ledger balance and owns a capacity pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerAsset {
    /// Volatile chain-native asset, 18 implied decimals
    Native,
    /// Designated stable asset, doubles as the unit of account
    Stable,
}

impl LedgerAsset {
    /// Both ledger classes, in pool order.
    pub const ALL: [LedgerAsset; 2] = [LedgerAsset::Native, LedgerAsset::Stable];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerAsset::Native => "native",
            LedgerAsset::Stable => "stable",
        }
    }
}

impl fmt::Display for LedgerAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any asset an entry point may be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Native,
    Stable,
    /// Any other fungible token; only valid as swap input
    Arbitrary(AssetId),
}

impl Asset {
    /// The ledger class of this asset, if it can be held as a balance.
    pub fn ledger_class(&self) -> Option<LedgerAsset> {
        match self {
            Asset::Native => Some(LedgerAsset::Native),
            Asset::Stable => Some(LedgerAsset::Stable),
            Asset::Arbitrary(_) => None,
        }
    }
}

impl From<LedgerAsset> for Asset {
    fn from(asset: LedgerAsset) -> Self {
        match asset {
            LedgerAsset::Native => Asset::Native,
            LedgerAsset::Stable => Asset::Stable,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => f.write_str("native"),
            Asset::Stable => f.write_str("stable"),
            Asset::Arbitrary(id) => write!(f, "arbitrary:{}", id),
        }
    }
}
