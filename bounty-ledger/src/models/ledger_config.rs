use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::types::{Address, TokenAmount};

use super::managers::ManagerList;
use crate::asset::{AssetHandle, FungibleAsset};

/// Which operations `pause` blocks. Administrative operations are never blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausePolicy {
    /// Only bounty creation.
    #[default]
    CreationOnly,
    /// Creation, claim and refund.
    AllLifecycle,
}

impl PausePolicy {
    pub fn blocks_settlement(&self) -> bool {
        matches!(self, PausePolicy::AllLifecycle)
    }
}

impl FromStr for PausePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "creation_only" => Ok(PausePolicy::CreationOnly),
            "all_lifecycle" => Ok(PausePolicy::AllLifecycle),
            other => Err(format!("unknown pause policy '{}'", other)),
        }
    }
}

/// Which of the two external ledgers a transfer touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Transaction,
    Investment,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Transaction => f.write_str("transaction"),
            AssetKind::Investment => f.write_str("investment"),
        }
    }
}

/// Ledger-wide settings, present once the ledger is initialized.
pub struct LedgerConfig {
    owner: Address,
    paused: bool,
    emission_rate: TokenAmount,
    minimum_manager_holding: TokenAmount,
    limit_managers: bool,
    managers: ManagerList,
    transaction_asset: AssetHandle,
    investment_asset: AssetHandle,
}

impl LedgerConfig {
    pub(crate) fn new(
        owner: Address,
        transaction_asset: AssetHandle,
        investment_asset: AssetHandle,
        emission_rate: TokenAmount,
        minimum_manager_holding: TokenAmount,
        managers: ManagerList,
    ) -> Self {
        Self {
            owner,
            paused: false,
            emission_rate,
            minimum_manager_holding,
            limit_managers: true,
            managers,
            transaction_asset,
            investment_asset,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn emission_rate(&self) -> TokenAmount {
        self.emission_rate
    }

    pub fn minimum_manager_holding(&self) -> TokenAmount {
        self.minimum_manager_holding
    }

    pub fn limit_managers(&self) -> bool {
        self.limit_managers
    }

    pub fn managers(&self) -> &ManagerList {
        &self.managers
    }

    pub fn transaction_asset(&self) -> &AssetHandle {
        &self.transaction_asset
    }

    pub fn investment_asset(&self) -> &AssetHandle {
        &self.investment_asset
    }

    pub fn asset(&self, kind: AssetKind) -> &AssetHandle {
        match kind {
            AssetKind::Transaction => &self.transaction_asset,
            AssetKind::Investment => &self.investment_asset,
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Address) {
        self.owner = owner;
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn set_emission_rate(&mut self, rate: TokenAmount) {
        self.emission_rate = rate;
    }

    pub(crate) fn set_minimum_manager_holding(&mut self, amount: TokenAmount) {
        self.minimum_manager_holding = amount;
    }

    pub(crate) fn set_limit_managers(&mut self, limit: bool) {
        self.limit_managers = limit;
    }

    pub(crate) fn set_managers(&mut self, managers: ManagerList) {
        self.managers = managers;
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("owner", &self.owner)
            .field("paused", &self.paused)
            .field("emission_rate", &self.emission_rate)
            .field("minimum_manager_holding", &self.minimum_manager_holding)
            .field("limit_managers", &self.limit_managers)
            .field("managers", &self.managers)
            .field("transaction_asset", &self.transaction_asset.symbol())
            .field("investment_asset", &self.investment_asset.symbol())
            .finish()
    }
}
