//! Thread-safe handle over a [`Vault`]
//!
//! Every entry point runs under one lock, so concurrent callers observe
//! the vault's operations as a single serial order.

use std::sync::{Arc, Mutex};
use tracing::error;

use crate::errors::CustodyError;
use crate::vault::Vault;

#[derive(Debug, Clone)]
pub struct SharedVault {
    inner: Arc<Mutex<Vault>>,
}

impl SharedVault {
    pub fn new(vault: Vault) -> Self {
        Self {
            inner: Arc::new(Mutex::new(vault)),
        }
    }

    /// Run `f` with exclusive access to the vault.
    ///
    /// A panic inside an earlier call (a pool released past its bound)
    /// may have left a half-applied mutation behind, so a poisoned lock
    /// fails every later call with `Halted`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Vault) -> R) -> Result<R, CustodyError> {
        match self.inner.lock() {
            Ok(mut guard) => Ok(f(&mut guard)),
            Err(_) => {
                error!("Vault lock poisoned, refusing further calls");
                Err(CustodyError::Halted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockEnvironment;
    use crate::policy::Limits;
    use std::thread;
    use types::asset::{Asset, LedgerAsset};
    use types::ids::AccountId;

    #[test]
    fn test_concurrent_deposits_never_oversubscribe() {
        let env = MockEnvironment::new(1_000, 2_500_0000_0000, 1, "admin");
        let limits = Limits {
            native_withdraw_limit: 10,
            stable_withdraw_limit: 1_000,
            oracle_max_staleness: 0,
        };
        let shared = SharedVault::new(Vault::new(limits, 100, 1_000, 6, env.collaborators()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let acc = AccountId::new();
                    let mut accepted = 0u128;
                    for _ in 0..10 {
                        if shared.with(|v| v.deposit_stable(acc, 20)).and_then(|r| r).is_ok() {
                            accepted += 20;
                        }
                    }
                    (acc, accepted)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let total: u128 = results.iter().map(|(_, a)| a).sum();
        assert_eq!(total, 1_000);

        shared
            .with(|v| {
                assert_eq!(v.remaining_capacity(LedgerAsset::Stable), 0);
                for (acc, accepted) in &results {
                    assert_eq!(v.balance_of(acc, LedgerAsset::Stable), *accepted);
                }
                assert!(v.check_invariants().is_ok());
            })
            .unwrap();
    }

    #[test]
    fn test_concurrent_withdrawals_cannot_double_spend() {
        let env = MockEnvironment::new(1_000, 2_500_0000_0000, 1, "admin");
        let limits = Limits {
            native_withdraw_limit: 10,
            stable_withdraw_limit: 1_000,
            oracle_max_staleness: 0,
        };
        let shared = SharedVault::new(Vault::new(limits, 100, 1_000, 6, env.collaborators()));
        let acc = AccountId::new();
        shared.with(|v| v.deposit_stable(acc, 100)).unwrap().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .with(|v| v.withdraw(acc, &Asset::Stable, 60))
                        .and_then(|r| r)
                        .is_ok()
                })
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(shared.with(|v| v.balance_of(&acc, LedgerAsset::Stable)), Ok(40));
    }

    #[test]
    fn test_panic_mid_call_halts_vault() {
        let env = MockEnvironment::new(1_000, 2_500_0000_0000, 1, "admin");
        let limits = Limits {
            native_withdraw_limit: 10,
            stable_withdraw_limit: 1_000,
            oracle_max_staleness: 0,
        };
        let shared = SharedVault::new(Vault::new(limits, 100, 1_000, 6, env.collaborators()));
        let acc = AccountId::new();

        let handle = shared.clone();
        let crashed = thread::spawn(move || {
            handle.with(|v| {
                v.deposit_stable(acc, 10).unwrap();
                v.pool_mut(LedgerAsset::Stable).release(u128::MAX);
            })
        })
        .join();
        assert!(crashed.is_err());

        assert_eq!(
            shared.with(|v| v.balance_of(&acc, LedgerAsset::Stable)),
            Err(CustodyError::Halted)
        );
        assert_eq!(
            shared.with(|v| v.deposit_stable(acc, 1)).map(|_| ()),
            Err(CustodyError::Halted)
        );
    }
}
