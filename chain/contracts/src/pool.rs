//! Capacity pools
//!
//! One pool per ledger asset class tracks how much more may be deposited.
//! Invariant: `0 <= remaining <= max_capacity`.

use serde::{Deserialize, Serialize};
use types::asset::LedgerAsset;

use crate::errors::CustodyError;

/// Headroom counter against an immutable maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPool {
    asset: LedgerAsset,
    max_capacity: u128,
    remaining: u128,
}

impl CapacityPool {
    /// A pool with all of its capacity free.
    pub fn new(asset: LedgerAsset, max_capacity: u128) -> Self {
        Self {
            asset,
            max_capacity,
            remaining: max_capacity,
        }
    }

    pub fn max_capacity(&self) -> u128 {
        self.max_capacity
    }

    pub fn remaining(&self) -> u128 {
        self.remaining
    }

    /// Capacity currently consumed by outstanding balances.
    pub fn used(&self) -> u128 {
        self.max_capacity.saturating_sub(self.remaining)
    }

    /// Fail unless `amount` fits in the remaining headroom. No mutation.
    pub fn ensure_available(&self, amount: u128) -> Result<(), CustodyError> {
        if amount > self.remaining {
            return Err(CustodyError::CapacityExceeded {
                asset: self.asset,
                requested: amount,
                available: self.remaining,
            });
        }
        Ok(())
    }

    /// Consume `amount` of headroom, or fail leaving the pool untouched.
    pub fn try_consume(&mut self, amount: u128) -> Result<(), CustodyError> {
        self.ensure_available(amount)?;
        self.remaining -= amount;
        Ok(())
    }

    /// Give `amount` of headroom back.
    ///
    /// # Panics
    /// Panics on overflow: more released than was ever consumed.
    pub fn release(&mut self, amount: u128) {
        self.remaining = match self.remaining.checked_add(amount) {
            Some(remaining) => remaining,
            None => panic!(
                "{} pool released past u128: remaining {}, release {}",
                self.asset, self.remaining, amount
            ),
        };
    }

    /// `0 <= remaining <= max_capacity`.
    pub fn is_within_bounds(&self) -> bool {
        self.remaining <= self.max_capacity
    }
}
