//! Vault configuration
//!
//! Capacities and limits are written as human decimal amounts and turned
//! into smallest units on load. Loading rejects amounts that would need
//! rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::units::{to_base_units, NATIVE_DECIMALS, STABLE_UNIT_DECIMALS};

use crate::errors::ConfigError;
use crate::policy::Limits;

/// Highest stable-asset decimal count accepted.
pub const MAX_STABLE_DECIMALS: u8 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Native pool capacity, in whole native units
    pub native_capacity: Decimal,
    /// Stable pool capacity, in USD
    pub stable_capacity: Decimal,
    /// Decimal places of the stable token
    #[serde(default = "default_stable_decimals")]
    pub stable_decimals: u8,
    /// Per-transaction native cap, in whole native units
    pub native_withdraw_limit: Decimal,
    /// Per-transaction cap, in USD
    pub stable_withdraw_limit: Decimal,
    /// 0 disables the oracle staleness check
    #[serde(default)]
    pub oracle_max_staleness_secs: u64,
}

fn default_stable_decimals() -> u8 {
    STABLE_UNIT_DECIMALS
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            native_capacity: Decimal::from(100),
            stable_capacity: Decimal::from(1_000_000),
            stable_decimals: STABLE_UNIT_DECIMALS,
            native_withdraw_limit: Decimal::from(10),
            stable_withdraw_limit: Decimal::from(1000),
            oracle_max_staleness_secs: 3600,
        }
    }
}

impl VaultConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: VaultConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stable_decimals > MAX_STABLE_DECIMALS {
            return Err(ConfigError::StableDecimals {
                decimals: self.stable_decimals,
            });
        }
        if self.native_capacity_units()? == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "native_capacity",
            });
        }
        if self.stable_capacity_units()? == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "stable_capacity",
            });
        }
        self.limits()?;
        Ok(())
    }

    /// Native pool capacity in native smallest units.
    pub fn native_capacity_units(&self) -> Result<u128, ConfigError> {
        convert("native_capacity", self.native_capacity, NATIVE_DECIMALS)
    }

    /// Stable pool capacity in stable units.
    pub fn stable_capacity_units(&self) -> Result<u128, ConfigError> {
        convert("stable_capacity", self.stable_capacity, STABLE_UNIT_DECIMALS)
    }

    pub fn limits(&self) -> Result<Limits, ConfigError> {
        Ok(Limits {
            native_withdraw_limit: convert(
                "native_withdraw_limit",
                self.native_withdraw_limit,
                NATIVE_DECIMALS,
            )?,
            stable_withdraw_limit: convert(
                "stable_withdraw_limit",
                self.stable_withdraw_limit,
                STABLE_UNIT_DECIMALS,
            )?,
            oracle_max_staleness: self.oracle_max_staleness_secs,
        })
    }
}

fn convert(field: &'static str, amount: Decimal, decimals: u8) -> Result<u128, ConfigError> {
    to_base_units(amount, decimals).map_err(|source| ConfigError::InvalidAmount { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_NATIVE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_default_limits() {
        let limits = VaultConfig::default().limits().unwrap();
        assert_eq!(limits.native_withdraw_limit, 10 * ONE_NATIVE);
        assert_eq!(limits.stable_withdraw_limit, 1_000_000_000);
        assert_eq!(limits.oracle_max_staleness, 3600);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "native_capacity": "100",
            "stable_capacity": "1000",
            "stable_decimals": 18,
            "native_withdraw_limit": "0.5",
            "stable_withdraw_limit": "250.25",
            "oracle_max_staleness_secs": 0
        }"#;
        let config = VaultConfig::from_json_str(json).unwrap();
        assert_eq!(config.stable_decimals, 18);
        assert_eq!(config.native_capacity_units().unwrap(), 100 * ONE_NATIVE);
        assert_eq!(config.stable_capacity_units().unwrap(), 1_000_000_000);

        let limits = config.limits().unwrap();
        assert_eq!(limits.native_withdraw_limit, ONE_NATIVE / 2);
        assert_eq!(limits.stable_withdraw_limit, 250_250_000);
        assert_eq!(limits.oracle_max_staleness, 0);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let json = r#"{
            "native_capacity": "1",
            "stable_capacity": "1",
            "native_withdraw_limit": "1",
            "stable_withdraw_limit": "1"
        }"#;
        let config = VaultConfig::from_json_str(json).unwrap();
        assert_eq!(config.stable_decimals, 6);
        assert_eq!(config.oracle_max_staleness_secs, 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = VaultConfig {
            stable_capacity: Decimal::ZERO,
            ..VaultConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { field: "stable_capacity" })
        ));
    }

    #[test]
    fn test_sub_unit_limit_rejected() {
        let config = VaultConfig {
            stable_withdraw_limit: Decimal::new(1, 7),
            ..VaultConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAmount { field: "stable_withdraw_limit", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            VaultConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
