//! Price oracle adapter
//!
//! Turns the raw report of an external price feed into a validated price,
//! or a typed failure. One query per call, no retries.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::OracleError;

/// Raw report from a price feed: native asset priced in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReport {
    /// Price scaled by `10^price_decimals`
    pub price: i128,
    pub price_decimals: u8,
    /// Unix seconds of the feed's last update
    pub updated_at: u64,
}

impl PriceReport {
    pub fn new(price: i128, price_decimals: u8, updated_at: u64) -> Self {
        Self {
            price,
            price_decimals,
            updated_at,
        }
    }
}

/// External price feed.
pub trait PriceFeed: Send + Sync {
    fn latest_report(&self) -> PriceReport;
}

/// Validates feed reports against a staleness limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceOracleAdapter {
    /// Seconds; 0 disables the check
    max_staleness: u64,
}

impl PriceOracleAdapter {
    pub fn new(max_staleness: u64) -> Self {
        Self { max_staleness }
    }

    /// Query the feed once and validate the report at time `now`.
    pub fn latest(&self, feed: &dyn PriceFeed, now: u64) -> Result<PriceReport, OracleError> {
        self.validate(feed.latest_report(), now)
    }

    /// Validate a report already in hand.
    ///
    /// An age of exactly `max_staleness` passes. Reports stamped in the
    /// future count as fresh.
    pub fn validate(&self, report: PriceReport, now: u64) -> Result<PriceReport, OracleError> {
        if report.price <= 0 {
            warn!(price = %report.price, "Rejecting non-positive oracle price");
            return Err(OracleError::InvalidPrice {
                price: report.price,
            });
        }

        if self.max_staleness > 0 && now.saturating_sub(report.updated_at) > self.max_staleness {
            warn!(
                updated_at = report.updated_at,
                now,
                max_staleness = self.max_staleness,
                "Rejecting stale oracle price"
            );
            return Err(OracleError::Stale {
                updated_at: report.updated_at,
                now,
            });
        }

        Ok(report)
    }
}
