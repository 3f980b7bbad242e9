//! Deposits — native, stable, and arbitrary tokens via swap
//!
//! Native and stable deposits check pool headroom before pulling funds, so
//! a capacity rejection never leaves pulled funds uncredited. Arbitrary
//! deposits swap first and check capacity afterwards; if that check fails
//! the swap output stays in custody and is recorded as stranded.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use types::asset::{Asset, LedgerAsset};
use types::ids::{AccountId, AssetId};

use crate::errors::CustodyError;
use crate::events::{ContractEvent, Deposited, SwapStranded, TokenSwapped};
use crate::vault::{StrandedSwap, Vault};

/// Caller-supplied bounds for the swap leg of an arbitrary deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Least stable smallest units the deposit may receive
    pub min_amount_out: u128,
    /// Unix seconds after which the swap must not execute
    pub deadline: u64,
}

impl Vault {
    /// Deposit native asset.
    ///
    /// Consumes native pool headroom 1:1 and credits the same amount.
    pub fn deposit_native(
        &mut self,
        account: AccountId,
        amount: u128,
    ) -> Result<ContractEvent, CustodyError> {
        if amount == 0 {
            return Err(CustodyError::InvalidValue);
        }
        self.pull_and_credit(account, LedgerAsset::Native, amount)
    }

    /// Deposit stable asset.
    ///
    /// The pool is charged in stable units; the ledger is credited in the
    /// token's own smallest unit.
    pub fn deposit_stable(
        &mut self,
        account: AccountId,
        amount: u128,
    ) -> Result<ContractEvent, CustodyError> {
        if amount == 0 {
            return Err(CustodyError::InvalidValue);
        }
        self.pull_and_credit(account, LedgerAsset::Stable, amount)
    }

    /// Deposit an arbitrary token by swapping it into the stable asset.
    ///
    /// Returns the stable amount credited, measured from custody holdings
    /// rather than trusted from the venue.
    pub fn deposit_arbitrary(
        &mut self,
        account: AccountId,
        asset_in: &Asset,
        amount_in: u128,
        swap: SwapRequest,
    ) -> Result<u128, CustodyError> {
        if amount_in == 0 {
            return Err(CustodyError::InvalidValue);
        }
        let token = match asset_in {
            Asset::Arbitrary(token) => token.clone(),
            Asset::Native | Asset::Stable => {
                return Err(CustodyError::UnsupportedAsset {
                    asset: asset_in.clone(),
                })
            }
        };

        let now = self.now();
        if swap.min_amount_out == 0 {
            return Err(CustodyError::InvalidSwapParams {
                reason: "minimum output must be positive".to_string(),
            });
        }
        if swap.deadline < now {
            return Err(CustodyError::InvalidSwapParams {
                reason: format!("deadline {} already passed at {}", swap.deadline, now),
            });
        }

        self.collaborators
            .custodian
            .pull(&account, asset_in, amount_in)
            .map_err(|e| CustodyError::TransferFailed { reason: e.reason })?;

        let before = self.collaborators.custodian.held(&Asset::Stable);
        if let Err(e) = self.collaborators.swap_venue.swap(
            &token,
            amount_in,
            swap.min_amount_out,
            swap.deadline,
        ) {
            warn!(%account, asset_in = %token, amount_in, reason = %e, "Swap failed, refunding input");
            if let Err(refund) = self.collaborators.custodian.push(&account, asset_in, amount_in) {
                error!(%account, asset_in = %token, amount_in, reason = %refund, "Refund of swap input failed");
            }
            return Err(CustodyError::TransferFailed { reason: e.reason });
        }
        let after = self.collaborators.custodian.held(&Asset::Stable);
        let received = after.saturating_sub(before);

        info!(%account, asset_in = %token, amount_in, received, "Token swapped");
        self.emit(ContractEvent::TokenSwapped(TokenSwapped {
            account_id: account,
            asset_in: token.clone(),
            amount_in,
            amount_out: received,
        }));

        // Past this point the swap is irreversible.
        if received < swap.min_amount_out {
            let err = CustodyError::SlippageExceeded {
                received,
                min_required: swap.min_amount_out,
            };
            self.strand(account, token, amount_in, received, &err);
            return Err(err);
        }

        let credited = self
            .credit_charge(LedgerAsset::Stable, received)
            .and_then(|pool_units| {
                self.commit_credit(account, LedgerAsset::Stable, received, pool_units)?;
                Ok(pool_units)
            });
        let pool_units = match credited {
            Ok(pool_units) => pool_units,
            Err(err) => {
                self.strand(account, token, amount_in, received, &err);
                return Err(err);
            }
        };

        self.deposit_count += 1;
        info!(%account, amount = received, pool_units, "Stable deposit via swap credited");
        self.emit(ContractEvent::Deposited(Deposited {
            account_id: account,
            asset: LedgerAsset::Stable,
            amount: received,
            pool_units,
        }));
        Ok(received)
    }

    fn pull_and_credit(
        &mut self,
        account: AccountId,
        asset: LedgerAsset,
        amount: u128,
    ) -> Result<ContractEvent, CustodyError> {
        let pool_units = self.credit_charge(asset, amount)?;
        if let Err(err) = self.pool(asset).ensure_available(pool_units) {
            warn!(%account, %asset, amount, pool_units, "Deposit rejected: {}", err);
            return Err(err);
        }

        self.collaborators
            .custodian
            .pull(&account, &Asset::from(asset), amount)
            .map_err(|e| CustodyError::TransferFailed { reason: e.reason })?;

        self.commit_credit(account, asset, amount, pool_units)?;
        self.deposit_count += 1;

        info!(
            %account,
            %asset,
            amount,
            pool_units,
            remaining = self.pool(asset).remaining(),
            "Deposit credited"
        );
        let event = ContractEvent::Deposited(Deposited {
            account_id: account,
            asset,
            amount,
            pool_units,
        });
        self.emit(event.clone());
        Ok(event)
    }

    fn strand(
        &mut self,
        account: AccountId,
        asset_in: AssetId,
        amount_in: u128,
        amount_out: u128,
        err: &CustodyError,
    ) {
        error!(
            %account,
            asset_in = %asset_in,
            amount_in,
            amount_out,
            reason = %err,
            "Swap output stranded in custody"
        );
        self.stranded.push(StrandedSwap {
            account_id: account,
            asset_in: asset_in.clone(),
            amount_in,
            amount_out,
            reason: err.to_string(),
        });
        self.emit(ContractEvent::SwapStranded(SwapStranded {
            account_id: account,
            asset_in,
            amount_in,
            amount_out,
            reason: err.to_string(),
        }));
    }
}
