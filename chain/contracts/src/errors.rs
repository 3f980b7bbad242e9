//! Contract-specific error types
//!
//! Every failure is a structured value carrying the operands that decided
//! it. Component errors (oracle, conversion) flatten into `CustodyError`,
//! which is what every public entry point returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use types::asset::{Asset, LedgerAsset};

use crate::security::Capability;

/// Which per-transaction withdrawal ceiling was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// Ceiling in native smallest units
    Native,
    /// Ceiling in stable units of account
    Stable,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::Native => f.write_str("native"),
            LimitKind::Stable => f.write_str("stable"),
        }
    }
}

/// Price feed validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Invalid oracle price: {price}")]
    InvalidPrice { price: i128 },

    #[error("Oracle price stale: updated at {updated_at}, now {now}")]
    Stale { updated_at: u64, now: u64 },
}

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid price for conversion: {price}")]
    InvalidPrice { price: i128 },

    #[error("Conversion overflow")]
    ConversionOverflow,
}

/// Errors surfaced by custody entry points
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustodyError {
    #[error("Amount must be positive")]
    InvalidValue,

    #[error("Capacity exceeded for {asset} pool: requested {requested}, available {available}")]
    CapacityExceeded {
        asset: LedgerAsset,
        requested: u128,
        available: u128,
    },

    #[error("Insufficient {asset} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        asset: LedgerAsset,
        requested: u128,
        available: u128,
    },

    #[error("Withdraw limit exceeded ({kind}): requested {requested}, limit {limit}")]
    WithdrawLimitExceeded {
        kind: LimitKind,
        requested: u128,
        limit: u128,
    },

    #[error("Unsupported asset for this operation: {asset}")]
    UnsupportedAsset { asset: Asset },

    #[error("Invalid price: {price}")]
    InvalidPrice { price: i128 },

    #[error("Oracle price stale: updated at {updated_at}, now {now}")]
    OracleStale { updated_at: u64, now: u64 },

    #[error("Conversion overflow")]
    ConversionOverflow,

    #[error("Slippage exceeded: received {received}, minimum {min_required}")]
    SlippageExceeded { received: u128, min_required: u128 },

    #[error("Invalid swap parameters: {reason}")]
    InvalidSwapParams { reason: String },

    #[error("Transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("Unauthorized: {caller} lacks {capability}")]
    Unauthorized {
        caller: String,
        capability: Capability,
    },

    #[error("Arithmetic overflow in balance calculation")]
    BalanceOverflow,

    #[error("Vault halted: an earlier call panicked mid-mutation")]
    Halted,
}

impl From<OracleError> for CustodyError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::InvalidPrice { price } => CustodyError::InvalidPrice { price },
            OracleError::Stale { updated_at, now } => CustodyError::OracleStale { updated_at, now },
        }
    }
}

impl From<ConversionError> for CustodyError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidPrice { price } => CustodyError::InvalidPrice { price },
            ConversionError::ConversionOverflow => CustodyError::ConversionOverflow,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid amount for {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: types::units::UnitsError,
    },

    #[error("Capacity must be positive: {field}")]
    ZeroCapacity { field: &'static str },

    #[error("Unsupported stable decimals: {decimals}")]
    StableDecimals { decimals: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_display() {
        let err = CustodyError::CapacityExceeded {
            asset: LedgerAsset::Stable,
            requested: 1500,
            available: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Capacity exceeded for stable pool: requested 1500, available 1000"
        );
    }

    #[test]
    fn test_limit_error_display() {
        let err = CustodyError::WithdrawLimitExceeded {
            kind: LimitKind::Stable,
            requested: 1250,
            limit: 1000,
        };
        assert!(err.to_string().contains("stable"));
        assert!(err.to_string().contains("1250"));
    }

    #[test]
    fn test_oracle_error_flattens() {
        let err: CustodyError = OracleError::Stale {
            updated_at: 10,
            now: 100,
        }
        .into();
        assert_eq!(err, CustodyError::OracleStale { updated_at: 10, now: 100 });

        let err: CustodyError = OracleError::InvalidPrice { price: -1 }.into();
        assert_eq!(err, CustodyError::InvalidPrice { price: -1 });
    }

    #[test]
    fn test_conversion_error_flattens() {
        let err: CustodyError = ConversionError::ConversionOverflow.into();
        assert_eq!(err, CustodyError::ConversionOverflow);
    }
}
