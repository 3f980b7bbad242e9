//! Balance ledger
//!
//! Maps (account, ledger asset) to an unsigned balance in the asset's
//! smallest unit. Unseen keys read as zero; a zero balance is kept, not
//! removed. A running total per asset backs the pool accounting.

use std::collections::HashMap;
use types::asset::LedgerAsset;
use types::ids::AccountId;

use crate::errors::CustodyError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    /// Balances: account -> (asset -> amount)
    balances: HashMap<AccountId, HashMap<LedgerAsset, u128>>,
    /// Sum of all balances per asset
    totals: HashMap<LedgerAsset, u128>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account` in `asset`, zero if never credited.
    pub fn read(&self, account: &AccountId, asset: LedgerAsset) -> u128 {
        self.balances
            .get(account)
            .and_then(|assets| assets.get(&asset))
            .copied()
            .unwrap_or(0)
    }

    /// Fail unless `account` holds at least `amount` of `asset`. No mutation.
    pub fn ensure_covers(
        &self,
        account: &AccountId,
        asset: LedgerAsset,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let available = self.read(account, asset);
        if amount > available {
            return Err(CustodyError::InsufficientBalance {
                asset,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Add `amount` with overflow protection.
    ///
    /// Checked against the asset total; a balance never exceeds it.
    pub fn credit(
        &mut self,
        account: AccountId,
        asset: LedgerAsset,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let total = self
            .total(asset)
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow)?;

        *self
            .balances
            .entry(account)
            .or_default()
            .entry(asset)
            .or_insert(0) += amount;
        self.totals.insert(asset, total);
        Ok(())
    }

    /// Subtract `amount`, failing with `InsufficientBalance` if it would go negative.
    pub fn debit(
        &mut self,
        account: &AccountId,
        asset: LedgerAsset,
        amount: u128,
    ) -> Result<(), CustodyError> {
        self.ensure_covers(account, asset, amount)?;
        if amount == 0 {
            return Ok(());
        }
        // ensure_covers guarantees the entry exists
        if let Some(current) = self
            .balances
            .get_mut(account)
            .and_then(|assets| assets.get_mut(&asset))
        {
            *current -= amount;
        }
        // the total includes the balance just covered
        if let Some(total) = self.totals.get_mut(&asset) {
            *total -= amount;
        }
        Ok(())
    }

    /// Overwrite a balance. Pool accounting is the caller's responsibility.
    pub(crate) fn set(
        &mut self,
        account: AccountId,
        asset: LedgerAsset,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let old = self.read(&account, asset);
        // old <= total, so only the raise can overflow
        let total = (self.total(asset) - old)
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow)?;

        self.balances
            .entry(account)
            .or_default()
            .insert(asset, amount);
        self.totals.insert(asset, total);
        Ok(())
    }

    /// Sum of every balance in `asset`.
    pub fn total(&self, asset: LedgerAsset) -> u128 {
        self.totals.get(&asset).copied().unwrap_or(0)
    }
}
