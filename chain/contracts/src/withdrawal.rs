//! Withdrawals — balance check, limit check, debit, payout
//!
//! Order is fixed: an insufficient balance is reported before any limit
//! breach, and the payout runs only after the ledger and pool are updated.
//! A failed payout is compensated so the call leaves no trace.

use tracing::{error, info, warn};
use types::asset::{Asset, LedgerAsset};
use types::ids::AccountId;
use uuid::Uuid;

use crate::errors::CustodyError;
use crate::events::{ContractEvent, Withdrawn};
use crate::vault::Vault;

impl Vault {
    /// Withdraw `amount` of `asset` to `account`.
    pub fn withdraw(
        &mut self,
        account: AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<ContractEvent, CustodyError> {
        if amount == 0 {
            return Err(CustodyError::InvalidValue);
        }
        let class = asset
            .ledger_class()
            .ok_or_else(|| CustodyError::UnsupportedAsset {
                asset: asset.clone(),
            })?;

        if let Err(err) = self.ledger.ensure_covers(&account, class, amount) {
            warn!(%account, asset = %class, amount, "Withdrawal rejected: {}", err);
            return Err(err);
        }
        let stable_value = self
            .policy
            .check(class, amount, &self.converter, || self.fresh_price())?;
        let pool_units = self.debit_refund(class, amount)?;

        self.ledger.debit(&account, class, amount)?;
        self.pool_mut(class).release(pool_units);

        if let Err(e) = self.collaborators.custodian.push(&account, asset, amount) {
            self.undo_withdrawal(account, class, amount, pool_units);
            return Err(CustodyError::TransferFailed { reason: e.reason });
        }

        self.withdraw_count += 1;
        info!(
            %account,
            asset = %class,
            amount,
            stable_value,
            remaining = self.pool(class).remaining(),
            "Withdrawal paid out"
        );
        let event = ContractEvent::Withdrawn(Withdrawn {
            withdrawal_id: Uuid::now_v7(),
            account_id: account,
            asset: class,
            amount,
            stable_value,
        });
        self.emit(event.clone());
        Ok(event)
    }

    /// Reverse a committed debit after the payout failed.
    fn undo_withdrawal(&mut self, account: AccountId, asset: LedgerAsset, amount: u128, pool_units: u128) {
        error!(%account, %asset, amount, "Payout failed, rolling back withdrawal");
        // Both restore values that were in place a moment ago.
        if let Err(err) = self.ledger.credit(account, asset, amount) {
            error!(%account, %asset, amount, "Rollback credit failed: {}", err);
        }
        if let Err(err) = self.pool_mut(asset).try_consume(pool_units) {
            error!(%asset, pool_units, "Rollback consume failed: {}", err);
        }
    }
}
