//! Contract events
//!
//! Immutable records emitted by committed operations, for audit and
//! observability consumers. Amounts are in the asset's smallest unit unless
//! the field name says otherwise.

use serde::{Deserialize, Serialize};
use types::asset::LedgerAsset;
use types::ids::{AccountId, AssetId};
use uuid::Uuid;

/// Funds credited to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub account_id: AccountId,
    pub asset: LedgerAsset,
    pub amount: u128,
    /// Capacity consumed from the asset's pool
    pub pool_units: u128,
}

/// Funds debited and paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub withdrawal_id: Uuid,
    pub account_id: AccountId,
    pub asset: LedgerAsset,
    pub amount: u128,
    /// Value in stable units at the time of withdrawal
    pub stable_value: u128,
}

/// Privileged balance overwrite.
///
/// `cap_delta` is the signed change of pool headroom: positive means
/// capacity was freed (user debited), negative means capacity was consumed
/// (user credited).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjusted {
    pub account_id: AccountId,
    pub asset: LedgerAsset,
    pub old_balance: u128,
    pub new_balance: u128,
    pub cap_delta: i128,
}

/// Arbitrary token converted into the stable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSwapped {
    pub account_id: AccountId,
    pub asset_in: AssetId,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Swap executed but the deposit was rejected afterwards; the output sits
/// in custody uncredited until reconciled out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapStranded {
    pub account_id: AccountId,
    pub asset_in: AssetId,
    pub amount_in: u128,
    pub amount_out: u128,
    pub reason: String,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    BalanceAdjusted(BalanceAdjusted),
    TokenSwapped(TokenSwapped),
    SwapStranded(SwapStranded),
}

impl ContractEvent {
    pub fn account_id(&self) -> &AccountId {
        match self {
            ContractEvent::Deposited(e) => &e.account_id,
            ContractEvent::Withdrawn(e) => &e.account_id,
            ContractEvent::BalanceAdjusted(e) => &e.account_id,
            ContractEvent::TokenSwapped(e) => &e.account_id,
            ContractEvent::SwapStranded(e) => &e.account_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_adjusted_serialization() {
        let event = ContractEvent::BalanceAdjusted(BalanceAdjusted {
            account_id: AccountId::new(),
            asset: LedgerAsset::Stable,
            old_balance: 100,
            new_balance: 40,
            cap_delta: 60,
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_large_amounts_survive_json() {
        let event = Withdrawn {
            withdrawal_id: Uuid::now_v7(),
            account_id: AccountId::new(),
            asset: LedgerAsset::Native,
            amount: 10_000_000_000_000_000_000_000,
            stable_value: 0,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: Withdrawn = serde_json::from_str(&json).unwrap();
        assert_eq!(event.amount, deser.amount);
    }

    #[test]
    fn test_event_account() {
        let acc = AccountId::new();
        let event = ContractEvent::TokenSwapped(TokenSwapped {
            account_id: acc,
            asset_in: AssetId::new("WBTC"),
            amount_in: 1,
            amount_out: 60_000_000_000,
        });
        assert_eq!(event.account_id(), &acc);
    }
}
