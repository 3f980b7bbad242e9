//! Decimal places and human-amount conversions
//!
//! Balances are unsigned integers in each asset's smallest unit. Humans
//! (and configuration files) write amounts as decimals; these helpers move
//! between the two without ever rounding.

use rust_decimal::Decimal;
use thiserror::Error;

/// Implied decimal places of the native asset.
pub const NATIVE_DECIMALS: u8 = 18;

/// Decimal places of the stable unit of account.
pub const STABLE_UNIT_DECIMALS: u8 = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    #[error("Negative amount: {0}")]
    Negative(Decimal),

    #[error("Amount {amount} has more than {decimals} decimal places")]
    TooPrecise { amount: Decimal, decimals: u8 },

    #[error("Amount {0} does not fit in base units")]
    Overflow(Decimal),
}

/// `10^exp` as u128, or `None` past 10^38.
pub fn pow10(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

/// Convert a human amount into smallest units.
///
/// Rejects amounts that carry more fractional digits than the asset has.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u128, UnitsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative(amount));
    }

    let normalized = amount.normalize();
    let scale = normalized.scale();
    if scale > u32::from(decimals) {
        return Err(UnitsError::TooPrecise { amount, decimals });
    }

    let mantissa = u128::try_from(normalized.mantissa()).map_err(|_| UnitsError::Overflow(amount))?;
    let factor = pow10(u32::from(decimals) - scale).ok_or(UnitsError::Overflow(amount))?;
    mantissa
        .checked_mul(factor)
        .ok_or(UnitsError::Overflow(amount))
}

/// Render smallest units as a human amount, if representable.
pub fn from_base_units(value: u128, decimals: u8) -> Option<Decimal> {
    let mantissa = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals))
        .ok()
        .map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_whole_native_amount() {
        assert_eq!(
            to_base_units(dec("10"), NATIVE_DECIMALS).unwrap(),
            10_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_fractional_stable_amount() {
        assert_eq!(to_base_units(dec("1000.5"), STABLE_UNIT_DECIMALS).unwrap(), 1_000_500_000);
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        assert_eq!(to_base_units(dec("1.500000000"), STABLE_UNIT_DECIMALS).unwrap(), 1_500_000);
    }

    #[test]
    fn test_too_precise_rejected() {
        let result = to_base_units(dec("0.0000001"), STABLE_UNIT_DECIMALS);
        assert!(matches!(result, Err(UnitsError::TooPrecise { .. })));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            to_base_units(dec("-1"), STABLE_UNIT_DECIMALS),
            Err(UnitsError::Negative(_))
        ));
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(1_250_000_000, STABLE_UNIT_DECIMALS), Some(dec("1250")));
        assert_eq!(from_base_units(300_000_000_000_000_000, NATIVE_DECIMALS), Some(dec("0.3")));
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fuzz_base_units_survive_display(value in 0u64..u64::MAX, decimals in 0u8..=18) {
                let human = from_base_units(u128::from(value), decimals).unwrap();
                prop_assert_eq!(to_base_units(human, decimals).unwrap(), u128::from(value));
            }
        }
    }
}
