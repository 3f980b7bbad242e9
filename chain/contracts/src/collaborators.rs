//! External collaborators consumed by the custody core
//!
//! Asset movement, token swaps, time and authorization live outside the
//! ledger. They are injected as trait objects so any backend (chain
//! client, test double, simulation) can stand in.

use chrono::Utc;
use thiserror::Error;
use types::asset::Asset;
use types::ids::{AccountId, AssetId};

use crate::oracle::PriceFeed;
use crate::security::Authorizer;

/// Failure reported by a custodian or swap venue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct TransferError {
    pub reason: String,
}

impl TransferError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Moves funds between users and custody.
pub trait AssetCustodian: Send + Sync {
    /// Move `amount` of `asset` from `account` into custody.
    fn pull(&self, account: &AccountId, asset: &Asset, amount: u128) -> Result<(), TransferError>;

    /// Pay `amount` of `asset` out of custody to `account`.
    fn push(&self, account: &AccountId, asset: &Asset, amount: u128) -> Result<(), TransferError>;

    /// Amount of `asset` currently held in custody.
    fn held(&self, asset: &Asset) -> u128;
}

/// Converts an arbitrary token held in custody into the stable asset.
pub trait SwapVenue: Send + Sync {
    /// Swap `amount_in` of `asset_in`, delivering at least `min_amount_out`
    /// stable units into custody before `deadline` (unix seconds).
    /// Returns the amount the venue reports as delivered.
    fn swap(
        &self,
        asset_in: &AssetId,
        amount_in: u128,
        min_amount_out: u128,
        deadline: u64,
    ) -> Result<u128, TransferError>;
}

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Everything the vault talks to outside its own state.
pub struct Collaborators {
    pub price_feed: Box<dyn PriceFeed>,
    pub custodian: Box<dyn AssetCustodian>,
    pub swap_venue: Box<dyn SwapVenue>,
    pub authorizer: Box<dyn Authorizer>,
    pub clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
