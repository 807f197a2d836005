//! Which managers may be assigned a new bounty.

use serde::Serialize;
use shared::types::{Address, TokenAmount};
use tracing::debug;

use crate::asset::FungibleAsset;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{LedgerConfig, ManagerList};

/// The rule under which a manager was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPath {
    /// Whitelist enforced and the candidate is on it; no holding required.
    Whitelisted,
    /// Whitelist not enforced and the candidate holds enough investment asset.
    Collateralized,
}

/// Applies the two mutually exclusive admission rules.
///
/// With `limit_managers` set only whitelisted candidates pass, whatever they
/// hold. Without it the whitelist is ignored and `holding_of` is consulted.
/// The zero address is never eligible.
pub fn evaluate<F>(
    limit_managers: bool,
    managers: &ManagerList,
    minimum_holding: TokenAmount,
    candidate: Address,
    holding_of: F,
) -> LedgerResult<EligibilityPath>
where
    F: FnOnce(Address) -> TokenAmount,
{
    if candidate.is_zero() {
        return Err(LedgerError::NotValidManager { manager: candidate });
    }

    if limit_managers {
        return if managers.contains(&candidate) {
            Ok(EligibilityPath::Whitelisted)
        } else {
            Err(LedgerError::NotValidManager { manager: candidate })
        };
    }

    let available = holding_of(candidate);
    if available >= minimum_holding {
        Ok(EligibilityPath::Collateralized)
    } else {
        Err(LedgerError::NotEnoughManagerHolding {
            manager: candidate,
            required: minimum_holding,
            available,
        })
    }
}

/// Evaluates `candidate` against the ledger's current settings, reading its
/// investment-asset balance only when the holding rule applies.
pub fn check(config: &LedgerConfig, candidate: Address) -> LedgerResult<EligibilityPath> {
    let path = evaluate(
        config.limit_managers(),
        config.managers(),
        config.minimum_manager_holding(),
        candidate,
        |account| config.investment_asset().balance_of(account),
    )?;

    debug!(manager = ?candidate, path = ?path, "Manager admitted");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::U256;

    fn whitelist() -> ManagerList {
        ManagerList::from_slice(&[Address::from_low_u64_be(7)]).unwrap()
    }

    fn minimum() -> U256 {
        U256::from(1_000u64)
    }

    #[test]
    fn test_whitelisted_manager_needs_no_holding() {
        let path = evaluate(true, &whitelist(), minimum(), Address::from_low_u64_be(7), |_| U256::zero());
        assert_eq!(path, Ok(EligibilityPath::Whitelisted));
    }

    #[test]
    fn test_whitelist_enforced_ignores_holding() {
        let outsider = Address::from_low_u64_be(8);
        let result = evaluate(true, &whitelist(), minimum(), outsider, |_| U256::MAX);
        assert_eq!(result, Err(LedgerError::NotValidManager { manager: outsider }));
    }

    #[test]
    fn test_open_market_requires_holding() {
        let candidate = Address::from_low_u64_be(8);

        let rich = evaluate(false, &whitelist(), minimum(), candidate, |_| U256::from(1_000u64));
        assert_eq!(rich, Ok(EligibilityPath::Collateralized));

        let poor = evaluate(false, &whitelist(), minimum(), candidate, |_| U256::from(999u64));
        assert_eq!(
            poor,
            Err(LedgerError::NotEnoughManagerHolding {
                manager: candidate,
                required: minimum(),
                available: U256::from(999u64),
            })
        );
    }

    #[test]
    fn test_open_market_ignores_whitelist_membership() {
        let listed = Address::from_low_u64_be(7);
        let result = evaluate(false, &whitelist(), minimum(), listed, |_| U256::zero());
        assert!(matches!(result, Err(LedgerError::NotEnoughManagerHolding { .. })));
    }

    #[test]
    fn test_holding_not_read_when_whitelist_enforced() {
        let mut consulted = false;
        let _ = evaluate(true, &whitelist(), minimum(), Address::from_low_u64_be(7), |_| {
            consulted = true;
            U256::zero()
        });
        assert!(!consulted);
    }

    #[test]
    fn test_zero_address_rejected() {
        let result = evaluate(false, &ManagerList::default(), U256::zero(), Address::zero(), |_| U256::MAX);
        assert_eq!(result, Err(LedgerError::NotValidManager { manager: Address::zero() }));
    }
}
