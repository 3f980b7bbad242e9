//! Recovery — privileged balance overwrite
//!
//! Used for dispute resolution. The overwrite is routed through the same
//! pool primitives as deposits and withdrawals: raising a balance consumes
//! headroom, lowering it releases headroom.

use tracing::{info, warn};
use types::asset::LedgerAsset;
use types::ids::AccountId;

use crate::errors::CustodyError;
use crate::events::{BalanceAdjusted, ContractEvent};
use crate::security::Capability;
use crate::vault::Vault;

impl Vault {
    /// Set `account`'s `asset` balance to `new_balance`.
    ///
    /// The emitted `cap_delta` is the signed change in pool headroom:
    /// positive when the user was debited, negative when credited, zero
    /// for a no-op.
    pub fn set_balance(
        &mut self,
        caller: &str,
        account: AccountId,
        asset: LedgerAsset,
        new_balance: u128,
    ) -> Result<ContractEvent, CustodyError> {
        self.authorize(caller, Capability::Recovery)?;

        let old_balance = self.ledger.read(&account, asset);
        let cap_delta = if new_balance > old_balance {
            let units = self.credit_charge(asset, new_balance - old_balance)?;
            let cap_delta = signed(units)?;
            if let Err(err) = self.pool(asset).ensure_available(units) {
                warn!(caller, %account, %asset, old_balance, new_balance, "Recovery rejected: {}", err);
                return Err(err);
            }
            self.ledger.set(account, asset, new_balance)?;
            // headroom verified above
            self.pool_mut(asset).try_consume(units)?;
            -cap_delta
        } else if new_balance < old_balance {
            let units = self.debit_refund(asset, old_balance - new_balance)?;
            let cap_delta = signed(units)?;
            self.ledger.set(account, asset, new_balance)?;
            self.pool_mut(asset).release(units);
            cap_delta
        } else {
            0
        };

        if cap_delta != 0 {
            self.adjustment_count += 1;
        }
        info!(
            caller,
            %account,
            %asset,
            old_balance,
            new_balance,
            cap_delta,
            "Balance adjusted"
        );
        let event = ContractEvent::BalanceAdjusted(BalanceAdjusted {
            account_id: account,
            asset,
            old_balance,
            new_balance,
            cap_delta,
        });
        self.emit(event.clone());
        Ok(event)
    }
}

fn signed(units: u128) -> Result<i128, CustodyError> {
    i128::try_from(units).map_err(|_| CustodyError::ConversionOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockEnvironment;
    use crate::policy::Limits;
    use crate::security::Role;

    const ONE_NATIVE: u128 = 1_000_000_000_000_000_000;
    const ONE_USD: u128 = 1_000_000;

    fn setup(native_cap: u128, stable_cap: u128) -> Vault {
        let mut env = MockEnvironment::new(1_000, 2_500_0000_0000, 1, "admin");
        env.access.grant_role("support", Role::Operator);
        let limits = Limits {
            native_withdraw_limit: 10 * ONE_NATIVE,
            stable_withdraw_limit: 1000 * ONE_USD,
            oracle_max_staleness: 3600,
        };
        Vault::new(limits, native_cap, stable_cap, 6, env.collaborators())
    }

    fn cap_delta(event: &ContractEvent) -> i128 {
        match event {
            ContractEvent::BalanceAdjusted(e) => e.cap_delta,
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_raise_balance_consumes_capacity() {
        let mut vault = setup(100, 1000 * ONE_USD);
        let acc = AccountId::new();

        let event = vault.set_balance("admin", acc, LedgerAsset::Stable, 300 * ONE_USD).unwrap();
        assert_eq!(cap_delta(&event), -(300 * ONE_USD as i128));
        assert_eq!(vault.balance_of(&acc, LedgerAsset::Stable), 300 * ONE_USD);
        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), 700 * ONE_USD);
        assert_eq!(vault.adjustment_count(), 1);
    }

    #[test]
    fn test_lower_balance_releases_capacity() {
        let mut vault = setup(100, 1000 * ONE_USD);
        let acc = AccountId::new();
        vault.deposit_stable(acc, 500 * ONE_USD).unwrap();

        let event = vault.set_balance("admin", acc, LedgerAsset::Stable, 200 * ONE_USD).unwrap();
        assert_eq!(cap_delta(&event), 300 * ONE_USD as i128);
        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), 800 * ONE_USD);
        assert!(vault.check_invariants().is_ok());
    }

    #[test]
    fn test_raise_without_headroom_fails() {
        let mut vault = setup(ONE_NATIVE, 100);
        let acc = AccountId::new();
        vault.deposit_native(AccountId::new(), ONE_NATIVE).unwrap();

        let result = vault.set_balance("admin", acc, LedgerAsset::Native, ONE_NATIVE);
        assert_eq!(
            result,
            Err(CustodyError::CapacityExceeded {
                asset: LedgerAsset::Native,
                requested: ONE_NATIVE,
                available: 0,
            })
        );
        assert_eq!(vault.balance_of(&acc, LedgerAsset::Native), 0);
    }

    #[test]
    fn test_same_balance_is_noop() {
        let mut vault = setup(100, 1000);
        let acc = AccountId::new();
        vault.deposit_stable(acc, 40).unwrap();
        let remaining = vault.remaining_capacity(LedgerAsset::Stable);

        let event = vault.set_balance("admin", acc, LedgerAsset::Stable, 40).unwrap();
        assert_eq!(cap_delta(&event), 0);
        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), remaining);
        assert_eq!(vault.balance_of(&acc, LedgerAsset::Stable), 40);
        assert_eq!(vault.adjustment_count(), 0);
    }

    #[test]
    fn test_round_trip_restores_capacity() {
        let mut vault = setup(100, 1000);
        let acc = AccountId::new();
        vault.deposit_stable(acc, 250).unwrap();
        let remaining = vault.remaining_capacity(LedgerAsset::Stable);

        vault.set_balance("admin", acc, LedgerAsset::Stable, 900).unwrap();
        vault.set_balance("admin", acc, LedgerAsset::Stable, 250).unwrap();
        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), remaining);
    }

    #[test]
    fn test_round_trip_with_wide_stable_token() {
        let env = MockEnvironment::new(1_000, 2_500_0000_0000, 1, "admin");
        let limits = Limits {
            native_withdraw_limit: 10,
            stable_withdraw_limit: 1_000,
            oracle_max_staleness: 0,
        };
        let mut vault = Vault::new(limits, 10, 1_000, 18, env.collaborators());
        let acc = AccountId::new();

        // half a stable unit is charged as one
        let event = vault.set_balance("admin", acc, LedgerAsset::Stable, 500_000_000_000).unwrap();
        assert_eq!(cap_delta(&event), -1);
        let event = vault.set_balance("admin", acc, LedgerAsset::Stable, 0).unwrap();
        assert_eq!(cap_delta(&event), 1);

        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), 1_000);
        assert!(vault.check_invariants().is_ok());
    }

    #[test]
    fn test_recovery_requires_capability() {
        let mut vault = setup(100, 1000);
        let acc = AccountId::new();
        for caller in ["eve", "support"] {
            let result = vault.set_balance(caller, acc, LedgerAsset::Stable, 1);
            assert_eq!(
                result,
                Err(CustodyError::Unauthorized {
                    caller: caller.to_string(),
                    capability: Capability::Recovery,
                })
            );
        }
        assert_eq!(vault.remaining_capacity(LedgerAsset::Stable), 1000);
    }

    #[test]
    fn test_operator_can_inspect_other_balances() {
        let mut vault = setup(100, 1000);
        let acc = AccountId::new();
        vault.deposit_stable(acc, 7).unwrap();

        assert_eq!(vault.balance_of_for("support", &acc, LedgerAsset::Stable), Ok(7));
        assert_eq!(vault.balance_of_for(&acc.to_string(), &acc, LedgerAsset::Stable), Ok(7));
        assert!(matches!(
            vault.balance_of_for("eve", &acc, LedgerAsset::Stable),
            Err(CustodyError::Unauthorized { .. })
        ));
    }
}
