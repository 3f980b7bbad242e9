//! Conversion of ledger amounts into the stable unit of account
//!
//! The stable unit has 6 decimals. Stable-style assets are rescaled by a
//! power of ten (truncating on scale-down); the native asset is valued
//! through an oracle price using a 256-bit intermediate.

use alloy_primitives::U256;
use types::asset::LedgerAsset;
use types::units::{pow10, NATIVE_DECIMALS, STABLE_UNIT_DECIMALS};

use crate::errors::ConversionError;
use crate::oracle::PriceReport;

/// Rescale `amount` from `decimals` places to stable units.
pub fn rescale_to_stable_units(amount: u128, decimals: u8) -> Result<u128, ConversionError> {
    if decimals >= STABLE_UNIT_DECIMALS {
        let divisor = pow10(u32::from(decimals - STABLE_UNIT_DECIMALS))
            .ok_or(ConversionError::ConversionOverflow)?;
        Ok(amount / divisor)
    } else {
        let factor = pow10(u32::from(STABLE_UNIT_DECIMALS - decimals))
            .ok_or(ConversionError::ConversionOverflow)?;
        amount
            .checked_mul(factor)
            .ok_or(ConversionError::ConversionOverflow)
    }
}

/// Like [`rescale_to_stable_units`] but rounds a sub-unit remainder up.
pub fn rescale_to_stable_units_ceil(amount: u128, decimals: u8) -> Result<u128, ConversionError> {
    if decimals <= STABLE_UNIT_DECIMALS {
        return rescale_to_stable_units(amount, decimals);
    }
    let divisor = pow10(u32::from(decimals - STABLE_UNIT_DECIMALS))
        .ok_or(ConversionError::ConversionOverflow)?;
    let quotient = amount / divisor;
    if amount % divisor == 0 {
        Ok(quotient)
    } else {
        Ok(quotient + 1)
    }
}

/// Value `amount` native smallest units in stable units at `report`'s price.
///
/// Computes `amount * price * 10^6 / 10^(price_decimals + 18)`, multiplying
/// before dividing in 256 bits. Truncates.
pub fn native_to_stable_units(amount: u128, report: &PriceReport) -> Result<u128, ConversionError> {
    if report.price <= 0 {
        return Err(ConversionError::InvalidPrice {
            price: report.price,
        });
    }
    // price > 0 checked above
    let price = U256::from(report.price as u128);

    // 10^6 / 10^(d + 18) reduces to 1 / 10^(d + 12)
    let exp = u64::from(report.price_decimals) + u64::from(NATIVE_DECIMALS)
        - u64::from(STABLE_UNIT_DECIMALS);
    let denominator = U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(ConversionError::ConversionOverflow)?;

    let numerator = U256::from(amount)
        .checked_mul(price)
        .ok_or(ConversionError::ConversionOverflow)?;

    u128::try_from(numerator / denominator).map_err(|_| ConversionError::ConversionOverflow)
}

/// Stateless converter bound to the stable asset's decimal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConverter {
    stable_decimals: u8,
}

impl UnitConverter {
    pub fn new(stable_decimals: u8) -> Self {
        Self { stable_decimals }
    }

    pub fn stable_decimals(&self) -> u8 {
        self.stable_decimals
    }

    /// Stable-unit value of `amount` of `asset`.
    ///
    /// `price` is only invoked for the native asset.
    pub fn to_stable_units<E>(
        &self,
        asset: LedgerAsset,
        amount: u128,
        price: impl FnOnce() -> Result<PriceReport, E>,
    ) -> Result<u128, E>
    where
        E: From<ConversionError>,
    {
        match asset {
            LedgerAsset::Stable => Ok(rescale_to_stable_units(amount, self.stable_decimals)?),
            LedgerAsset::Native => {
                let report = price()?;
                Ok(native_to_stable_units(amount, &report)?)
            }
        }
    }

    /// Pool units backing a ledger total of `total` in `asset`.
    ///
    /// The native pool counts native units directly. The stable pool
    /// counts stable units, rounding a sub-unit remainder up, so a pool
    /// always covers the dust it holds.
    pub fn pool_units(&self, asset: LedgerAsset, total: u128) -> Result<u128, ConversionError> {
        match asset {
            LedgerAsset::Native => Ok(total),
            LedgerAsset::Stable => rescale_to_stable_units_ceil(total, self.stable_decimals),
        }
    }
}
