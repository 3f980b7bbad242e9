//! In-memory collaborators for tests and simulations
//!
//! Each mock is a cheap cloneable handle over shared state, so a test can
//! keep a handle and steer the collaborator (move the price, fail a
//! transfer, advance time) after the vault took ownership of its copy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use types::asset::Asset;
use types::ids::{AccountId, AssetId};

use crate::collaborators::{AssetCustodian, Clock, Collaborators, SwapVenue, TransferError};
use crate::oracle::{PriceFeed, PriceReport};
use crate::security::AccessControl;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settable clock.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Price feed returning whatever report was last set.
#[derive(Debug, Clone)]
pub struct MockPriceFeed {
    report: Arc<Mutex<PriceReport>>,
}

impl MockPriceFeed {
    pub fn new(report: PriceReport) -> Self {
        Self {
            report: Arc::new(Mutex::new(report)),
        }
    }

    pub fn set_price(&self, price: i128) {
        lock(&self.report).price = price;
    }

    pub fn set_updated_at(&self, updated_at: u64) {
        lock(&self.report).updated_at = updated_at;
    }
}

impl PriceFeed for MockPriceFeed {
    fn latest_report(&self) -> PriceReport {
        *lock(&self.report)
    }
}

/// A movement recorded by [`MockCustodian`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub account: AccountId,
    pub asset: Asset,
    pub amount: u128,
}

#[derive(Debug, Default)]
struct CustodyState {
    held: HashMap<Asset, u128>,
    pulls: Vec<Transfer>,
    pushes: Vec<Transfer>,
    fail_pull: Option<String>,
    fail_push: Option<String>,
}

/// Custodian keeping holdings in memory. Users have unlimited funds.
#[derive(Debug, Clone, Default)]
pub struct MockCustodian {
    state: Arc<Mutex<CustodyState>>,
}

impl MockCustodian {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following pull fail with `reason`; `None` to heal.
    pub fn fail_pulls(&self, reason: Option<&str>) {
        lock(&self.state).fail_pull = reason.map(str::to_string);
    }

    /// Make every following push fail with `reason`; `None` to heal.
    pub fn fail_pushes(&self, reason: Option<&str>) {
        lock(&self.state).fail_push = reason.map(str::to_string);
    }

    pub fn pulls(&self) -> Vec<Transfer> {
        lock(&self.state).pulls.clone()
    }

    pub fn pushes(&self) -> Vec<Transfer> {
        lock(&self.state).pushes.clone()
    }

    /// Move custody holdings directly, as a swap settlement would.
    pub fn adjust(&self, asset: &Asset, add: u128, remove: u128) {
        let mut state = lock(&self.state);
        let held = state.held.entry(asset.clone()).or_insert(0);
        *held = held.saturating_add(add).saturating_sub(remove);
    }
}

impl AssetCustodian for MockCustodian {
    fn pull(&self, account: &AccountId, asset: &Asset, amount: u128) -> Result<(), TransferError> {
        let mut state = lock(&self.state);
        if let Some(reason) = &state.fail_pull {
            return Err(TransferError::new(reason.clone()));
        }
        let held = state.held.entry(asset.clone()).or_insert(0);
        *held = held.saturating_add(amount);
        state.pulls.push(Transfer {
            account: *account,
            asset: asset.clone(),
            amount,
        });
        Ok(())
    }

    fn push(&self, account: &AccountId, asset: &Asset, amount: u128) -> Result<(), TransferError> {
        let mut state = lock(&self.state);
        if let Some(reason) = &state.fail_push {
            return Err(TransferError::new(reason.clone()));
        }
        let held = state.held.get(asset).copied().unwrap_or(0);
        if held < amount {
            return Err(TransferError::new("custody holds too little"));
        }
        state.held.insert(asset.clone(), held - amount);
        state.pushes.push(Transfer {
            account: *account,
            asset: asset.clone(),
            amount,
        });
        Ok(())
    }

    fn held(&self, asset: &Asset) -> u128 {
        lock(&self.state).held.get(asset).copied().unwrap_or(0)
    }
}

#[derive(Debug)]
struct VenueState {
    /// Stable smallest units paid per unit of input
    rate: u128,
    /// Deliver only this share (in percent) of the quoted output
    delivery_percent: u128,
    fail: Option<String>,
    enforce_minimum: bool,
}

/// Swap venue settling into a [`MockCustodian`] at a fixed rate.
#[derive(Debug, Clone)]
pub struct MockSwapVenue {
    custodian: MockCustodian,
    clock: ManualClock,
    state: Arc<Mutex<VenueState>>,
}

impl MockSwapVenue {
    pub fn new(custodian: MockCustodian, clock: ManualClock, rate: u128) -> Self {
        Self {
            custodian,
            clock,
            state: Arc::new(Mutex::new(VenueState {
                rate,
                delivery_percent: 100,
                fail: None,
                enforce_minimum: true,
            })),
        }
    }

    pub fn fail_swaps(&self, reason: Option<&str>) {
        lock(&self.state).fail = reason.map(str::to_string);
    }

    /// Deliver only `percent` of the quoted output into custody while
    /// still reporting the full quote, like a fee-on-transfer token.
    pub fn short_deliver(&self, percent: u128) {
        lock(&self.state).delivery_percent = percent;
    }

    /// Stop enforcing `min_amount_out` on the venue side.
    pub fn ignore_minimum(&self) {
        lock(&self.state).enforce_minimum = false;
    }
}

impl SwapVenue for MockSwapVenue {
    fn swap(
        &self,
        asset_in: &AssetId,
        amount_in: u128,
        min_amount_out: u128,
        deadline: u64,
    ) -> Result<u128, TransferError> {
        let state = lock(&self.state);
        if let Some(reason) = &state.fail {
            return Err(TransferError::new(reason.clone()));
        }
        if self.clock.now() > deadline {
            return Err(TransferError::new("deadline expired"));
        }
        let quoted = amount_in
            .checked_mul(state.rate)
            .ok_or_else(|| TransferError::new("quote overflow"))?;
        if state.enforce_minimum && quoted < min_amount_out {
            return Err(TransferError::new("insufficient output amount"));
        }
        let delivered = if state.delivery_percent >= 100 {
            quoted
        } else {
            quoted / 100 * state.delivery_percent
        };

        let input = Asset::Arbitrary(asset_in.clone());
        self.custodian.adjust(&input, 0, amount_in);
        self.custodian.adjust(&Asset::Stable, delivered, 0);
        Ok(quoted)
    }
}

/// A full set of mocks plus the handles to steer them.
#[derive(Debug, Clone)]
pub struct MockEnvironment {
    pub clock: ManualClock,
    pub price_feed: MockPriceFeed,
    pub custodian: MockCustodian,
    pub swap_venue: MockSwapVenue,
    pub access: AccessControl,
}

impl MockEnvironment {
    /// Mocks at time `now`, native priced at `price` with 8 decimals,
    /// arbitrary tokens swapping at `swap_rate`, `admin` holding every role.
    pub fn new(now: u64, price: i128, swap_rate: u128, admin: &str) -> Self {
        let clock = ManualClock::new(now);
        let custodian = MockCustodian::new();
        Self {
            price_feed: MockPriceFeed::new(PriceReport::new(price, 8, now)),
            swap_venue: MockSwapVenue::new(custodian.clone(), clock.clone(), swap_rate),
            custodian,
            clock,
            access: AccessControl::new(admin),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            price_feed: Box::new(self.price_feed.clone()),
            custodian: Box::new(self.custodian.clone()),
            swap_venue: Box::new(self.swap_venue.clone()),
            authorizer: Box::new(self.access.clone()),
            clock: Box::new(self.clock.clone()),
        }
    }
}
