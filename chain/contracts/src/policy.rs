//! Per-transaction withdrawal limits
//!
//! Two ceilings apply: a native-unit cap for the native asset, and a
//! stable-unit (USD) cap for every asset. Checks never mutate.

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::asset::LedgerAsset;

use crate::converter::UnitConverter;
use crate::errors::{CustodyError, LimitKind};
use crate::oracle::PriceReport;

/// Immutable limits fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Native smallest units
    pub native_withdraw_limit: u128,
    /// Stable units (6 decimals)
    pub stable_withdraw_limit: u128,
    /// Seconds; 0 disables the staleness check
    pub oracle_max_staleness: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPolicy {
    native_withdraw_limit: u128,
    stable_withdraw_limit: u128,
}

impl WithdrawalPolicy {
    pub fn new(limits: &Limits) -> Self {
        Self {
            native_withdraw_limit: limits.native_withdraw_limit,
            stable_withdraw_limit: limits.stable_withdraw_limit,
        }
    }

    /// Check a withdrawal of `amount` of `asset` against both ceilings.
    ///
    /// The native cap short-circuits before any price is fetched. Returns
    /// the stable-unit value of the withdrawal.
    pub fn check(
        &self,
        asset: LedgerAsset,
        amount: u128,
        converter: &UnitConverter,
        price: impl FnOnce() -> Result<PriceReport, CustodyError>,
    ) -> Result<u128, CustodyError> {
        if asset == LedgerAsset::Native && amount > self.native_withdraw_limit {
            warn!(amount, limit = self.native_withdraw_limit, "Native withdraw limit exceeded");
            return Err(CustodyError::WithdrawLimitExceeded {
                kind: LimitKind::Native,
                requested: amount,
                limit: self.native_withdraw_limit,
            });
        }

        let stable_value = converter.to_stable_units(asset, amount, price)?;
        if stable_value > self.stable_withdraw_limit {
            warn!(
                %asset,
                stable_value,
                limit = self.stable_withdraw_limit,
                "Stable withdraw limit exceeded"
            );
            return Err(CustodyError::WithdrawLimitExceeded {
                kind: LimitKind::Stable,
                requested: stable_value,
                limit: self.stable_withdraw_limit,
            });
        }

        Ok(stable_value)
    }
}
