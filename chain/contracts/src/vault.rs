//! Vault — the custody aggregate
//!
//! Owns the balance ledger, one capacity pool per ledger asset, the
//! immutable limits, and the injected collaborators. Entry points live in
//! `deposit`, `withdrawal` and `recovery`; this module holds construction,
//! read-only queries and shared internals.
//!
//! Every entry point takes `&mut self` and runs to completion: checks
//! first, then mutation. Wrap the vault in [`crate::shared::SharedVault`]
//! to serialize calls across threads.

use tracing::info;
use types::asset::{Asset, LedgerAsset};
use types::ids::{AccountId, AssetId};

use crate::collaborators::Collaborators;
use crate::converter::UnitConverter;
use crate::config::VaultConfig;
use crate::errors::{ConfigError, CustodyError};
use crate::events::ContractEvent;
use crate::ledger::BalanceLedger;
use crate::oracle::{PriceOracleAdapter, PriceReport};
use crate::policy::{Limits, WithdrawalPolicy};
use crate::pool::CapacityPool;
use crate::security::Capability;

/// Stable output of a swap that was never credited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandedSwap {
    pub account_id: AccountId,
    pub asset_in: AssetId,
    pub amount_in: u128,
    pub amount_out: u128,
    pub reason: String,
}

/// Core custody contract.
#[derive(Debug)]
pub struct Vault {
    pub(crate) ledger: BalanceLedger,
    pub(crate) native_pool: CapacityPool,
    pub(crate) stable_pool: CapacityPool,
    pub(crate) limits: Limits,
    pub(crate) policy: WithdrawalPolicy,
    pub(crate) oracle: PriceOracleAdapter,
    pub(crate) converter: UnitConverter,
    pub(crate) collaborators: Collaborators,
    pub(crate) deposit_count: u64,
    pub(crate) withdraw_count: u64,
    pub(crate) adjustment_count: u64,
    /// Swap outputs awaiting out-of-band reconciliation
    pub(crate) stranded: Vec<StrandedSwap>,
    /// Emitted events log (append-only)
    pub(crate) events: Vec<ContractEvent>,
}

impl Vault {
    /// Create a vault with both pools empty.
    ///
    /// `native_capacity` is in native smallest units, `stable_capacity` in
    /// stable units.
    pub fn new(
        limits: Limits,
        native_capacity: u128,
        stable_capacity: u128,
        stable_decimals: u8,
        collaborators: Collaborators,
    ) -> Self {
        info!(
            native_capacity,
            stable_capacity,
            stable_decimals,
            native_withdraw_limit = limits.native_withdraw_limit,
            stable_withdraw_limit = limits.stable_withdraw_limit,
            oracle_max_staleness = limits.oracle_max_staleness,
            "Vault initialized"
        );

        Self {
            ledger: BalanceLedger::new(),
            native_pool: CapacityPool::new(LedgerAsset::Native, native_capacity),
            stable_pool: CapacityPool::new(LedgerAsset::Stable, stable_capacity),
            limits,
            policy: WithdrawalPolicy::new(&limits),
            oracle: PriceOracleAdapter::new(limits.oracle_max_staleness),
            converter: UnitConverter::new(stable_decimals),
            collaborators,
            deposit_count: 0,
            withdraw_count: 0,
            adjustment_count: 0,
            stranded: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Create a vault from validated configuration.
    pub fn from_config(config: &VaultConfig, collaborators: Collaborators) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.limits()?,
            config.native_capacity_units()?,
            config.stable_capacity_units()?,
            config.stable_decimals,
            collaborators,
        ))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Balance of `account` in `asset`'s smallest unit.
    pub fn balance_of(&self, account: &AccountId, asset: LedgerAsset) -> u128 {
        self.ledger.read(account, asset)
    }

    /// Balance lookup on behalf of `caller`.
    ///
    /// Reading another account's balance needs `InspectBalances`.
    pub fn balance_of_for(
        &self,
        caller: &str,
        account: &AccountId,
        asset: LedgerAsset,
    ) -> Result<u128, CustodyError> {
        if caller != account.to_string() {
            self.authorize(caller, Capability::InspectBalances)?;
        }
        Ok(self.ledger.read(account, asset))
    }

    /// Headroom left in `asset`'s pool.
    pub fn remaining_capacity(&self, asset: LedgerAsset) -> u128 {
        self.pool(asset).remaining()
    }

    /// Read-only view of a pool.
    pub fn pool(&self, asset: LedgerAsset) -> &CapacityPool {
        match asset {
            LedgerAsset::Native => &self.native_pool,
            LedgerAsset::Stable => &self.stable_pool,
        }
    }

    /// Stable-unit value of `amount` of `asset` at the current price.
    pub fn preview_stable_value(&self, asset: &Asset, amount: u128) -> Result<u128, CustodyError> {
        let class = asset
            .ledger_class()
            .ok_or_else(|| CustodyError::UnsupportedAsset {
                asset: asset.clone(),
            })?;
        self.converter
            .to_stable_units(class, amount, || self.fresh_price())
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    pub fn withdraw_count(&self) -> u64 {
        self.withdraw_count
    }

    pub fn adjustment_count(&self) -> u64 {
        self.adjustment_count
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Swaps whose output sits in custody uncredited.
    pub fn stranded_swaps(&self) -> &[StrandedSwap] {
        &self.stranded
    }

    /// Check pool bounds and balance conservation for both pools.
    ///
    /// Every pool's used capacity must equal the pool units backing the
    /// ledger total, with stable dust rounded up.
    pub fn check_invariants(&self) -> Result<(), String> {
        for asset in LedgerAsset::ALL {
            let pool = self.pool(asset);
            if !pool.is_within_bounds() {
                return Err(format!(
                    "{} pool out of bounds: remaining {} > max {}",
                    asset,
                    pool.remaining(),
                    pool.max_capacity()
                ));
            }

            let outstanding = self
                .converter
                .pool_units(asset, self.ledger.total(asset))
                .map_err(|e| e.to_string())?;
            if pool.used() != outstanding {
                return Err(format!(
                    "{} pool conservation broken: used {}, outstanding {}",
                    asset,
                    pool.used(),
                    outstanding
                ));
            }
        }
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internals ─────────────────────────

    pub(crate) fn pool_mut(&mut self, asset: LedgerAsset) -> &mut CapacityPool {
        match asset {
            LedgerAsset::Native => &mut self.native_pool,
            LedgerAsset::Stable => &mut self.stable_pool,
        }
    }

    pub(crate) fn now(&self) -> u64 {
        self.collaborators.clock.now()
    }

    /// One validated oracle query.
    pub(crate) fn fresh_price(&self) -> Result<PriceReport, CustodyError> {
        let feed = self.collaborators.price_feed.as_ref();
        Ok(self.oracle.latest(feed, self.now())?)
    }

    pub(crate) fn authorize(&self, caller: &str, capability: Capability) -> Result<(), CustodyError> {
        if !self.collaborators.authorizer.has_capability(caller, capability) {
            tracing::warn!(caller, %capability, "Unauthorized call");
            return Err(CustodyError::Unauthorized {
                caller: caller.to_string(),
                capability,
            });
        }
        Ok(())
    }

    /// Pool units consumed when `asset`'s ledger total grows by `amount`.
    pub(crate) fn credit_charge(&self, asset: LedgerAsset, amount: u128) -> Result<u128, CustodyError> {
        let before = self.ledger.total(asset);
        let after = before
            .checked_add(amount)
            .ok_or(CustodyError::BalanceOverflow)?;
        // pool_units is monotone in the total
        Ok(self.converter.pool_units(asset, after)? - self.converter.pool_units(asset, before)?)
    }

    /// Pool units released when `asset`'s ledger total shrinks by `amount`.
    pub(crate) fn debit_refund(&self, asset: LedgerAsset, amount: u128) -> Result<u128, CustodyError> {
        let before = self.ledger.total(asset);
        let after = before.saturating_sub(amount);
        Ok(self.converter.pool_units(asset, before)? - self.converter.pool_units(asset, after)?)
    }

    /// Credit `amount` to the ledger and consume `pool_units` of headroom,
    /// both or neither.
    pub(crate) fn commit_credit(
        &mut self,
        account: AccountId,
        asset: LedgerAsset,
        amount: u128,
        pool_units: u128,
    ) -> Result<(), CustodyError> {
        self.pool(asset).ensure_available(pool_units)?;
        self.ledger.credit(account, asset, amount)?;
        // headroom verified above and nothing ran in between
        self.pool_mut(asset).try_consume(pool_units)
    }

    pub(crate) fn emit(&mut self, event: ContractEvent) {
        self.events.push(event);
    }
}
