//! Transfer plans executed on behalf of the ledger.
//!
//! A plan is checked in full before its first leg runs, so every rejection
//! the external assets could raise surfaces without moving funds.

use std::collections::HashMap;

use shared::types::{Address, TokenAmount};
use tracing::{debug, error};

use crate::asset::FungibleAsset;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AssetKind, LedgerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Move `amount` from `from` into custody using the ledger's allowance.
    Pull {
        asset: AssetKind,
        from: Address,
        amount: TokenAmount,
    },
    /// Pay `amount` out of custody to `to`.
    Pay {
        asset: AssetKind,
        to: Address,
        amount: TokenAmount,
    },
}

impl Leg {
    fn amount(&self) -> TokenAmount {
        match self {
            Leg::Pull { amount, .. } | Leg::Pay { amount, .. } => *amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettlementPlan {
    custody: Address,
    legs: Vec<Leg>,
}

impl SettlementPlan {
    pub fn new(custody: Address) -> Self {
        Self { custody, legs: Vec::new() }
    }

    pub fn pull(mut self, asset: AssetKind, from: Address, amount: TokenAmount) -> Self {
        self.legs.push(Leg::Pull { asset, from, amount });
        self
    }

    pub fn pay(mut self, asset: AssetKind, to: Address, amount: TokenAmount) -> Self {
        self.legs.push(Leg::Pay { asset, to, amount });
        self
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    fn effective_legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().filter(|leg| !leg.amount().is_zero())
    }

    /// Verifies every leg against current balances and allowances.
    ///
    /// Amounts are totalled per payer, so several legs drawing on the same
    /// account are checked together. Incoming pulls are not counted toward
    /// outgoing pays.
    pub fn precheck(&self, config: &LedgerConfig) -> LedgerResult<()> {
        let mut pulls: HashMap<(AssetKind, Address), TokenAmount> = HashMap::new();
        let mut pays: HashMap<AssetKind, TokenAmount> = HashMap::new();

        for leg in self.effective_legs() {
            match *leg {
                Leg::Pull { asset, from, amount } => {
                    let total = pulls.entry((asset, from)).or_default();
                    *total = total.checked_add(amount).ok_or(LedgerError::AmountOverflow)?;
                }
                Leg::Pay { asset, to, amount } => {
                    if to.is_zero() {
                        return Err(LedgerError::InvalidAddress("receiver"));
                    }
                    let total = pays.entry(asset).or_default();
                    *total = total.checked_add(amount).ok_or(LedgerError::AmountOverflow)?;
                }
            }
        }

        for ((kind, from), required) in pulls {
            let asset = config.asset(kind);

            let allowance = asset.allowance(from, self.custody);
            if allowance < required {
                return Err(LedgerError::NotEnoughAllowance { required, available: allowance });
            }

            let balance = asset.balance_of(from);
            if balance < required {
                return Err(LedgerError::NotEnoughClientHolding { required, available: balance });
            }
        }

        for (kind, required) in pays {
            let asset = config.asset(kind);
            let available = asset.balance_of(self.custody);
            if available < required {
                return Err(LedgerError::InsufficientCustody {
                    asset: asset.symbol().to_string(),
                    required,
                    available,
                });
            }
        }

        Ok(())
    }

    /// Runs the precheck, then every non-zero leg in order.
    pub fn execute(&self, config: &LedgerConfig) -> LedgerResult<()> {
        self.precheck(config)?;

        for (index, leg) in self.effective_legs().enumerate() {
            let outcome = match *leg {
                Leg::Pull { asset, from, amount } => {
                    config.asset(asset).transfer_from(self.custody, from, self.custody, amount)
                }
                Leg::Pay { asset, to, amount } => config.asset(asset).transfer(self.custody, to, amount),
            };

            match outcome {
                Ok(()) => debug!(leg = index, ?leg, "Settlement leg applied"),
                Err(e) => {
                    error!(leg = index, ?leg, error = %e, "Settlement leg failed after precheck");
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}
