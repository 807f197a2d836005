//! Fungible asset contract required by the ledger, plus an in-memory
//! reference implementation used by the sandbox service and the tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::types::{Address, TokenAmount};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("{asset}: insufficient balance for {account:?} (required {required}, available {available})")]
    InsufficientBalance {
        asset: String,
        account: Address,
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("{asset}: insufficient allowance from {owner:?} to {spender:?} (required {required}, available {available})")]
    InsufficientAllowance {
        asset: String,
        owner: Address,
        spender: Address,
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("{asset}: transfer to the zero address")]
    InvalidReceiver { asset: String },

    #[error("{asset}: balance overflow")]
    Overflow { asset: String },
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Balance, allowance and transfer semantics of an external token ledger.
///
/// `transfer` moves funds held by `sender`; `transfer_from` moves funds of
/// `owner` on behalf of `spender` and consumes allowance. Both fail without
/// effect when funds or allowance are short.
pub trait FungibleAsset: Send + Sync {
    fn symbol(&self) -> &str;

    fn decimals(&self) -> u32;

    fn balance_of(&self, account: Address) -> TokenAmount;

    fn allowance(&self, owner: Address, spender: Address) -> TokenAmount;

    fn transfer(&self, sender: Address, to: Address, amount: TokenAmount) -> AssetResult<()>;

    fn transfer_from(&self, spender: Address, owner: Address, to: Address, amount: TokenAmount) -> AssetResult<()>;
}

pub type AssetHandle = Arc<dyn FungibleAsset>;

#[derive(Debug, Default)]
struct AssetState {
    balances: HashMap<Address, TokenAmount>,
    allowances: HashMap<(Address, Address), TokenAmount>,
    total_supply: TokenAmount,
}

impl AssetState {
    fn balance(&self, account: &Address) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or_default()
    }
}

/// ERC-20 style token ledger kept in memory.
#[derive(Debug)]
pub struct InMemoryAsset {
    name: String,
    symbol: String,
    decimals: u32,
    state: RwLock<AssetState>,
}

impl InMemoryAsset {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            state: RwLock::new(AssetState::default()),
        }
    }

    /// Token with `initial_supply` credited to `deployer`.
    pub fn with_supply(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u32,
        deployer: Address,
        initial_supply: TokenAmount,
    ) -> AssetResult<Self> {
        let asset = Self::new(name, symbol, decimals);
        asset.mint(deployer, initial_supply)?;
        Ok(asset)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.state.read().total_supply
    }

    pub fn mint(&self, to: Address, amount: TokenAmount) -> AssetResult<()> {
        if to.is_zero() {
            return Err(self.invalid_receiver());
        }

        let mut state = self.state.write();
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| self.overflow())?;
        let balance = state.balance(&to).checked_add(amount).ok_or_else(|| self.overflow())?;

        state.total_supply = supply;
        state.balances.insert(to, balance);
        debug!(asset = %self.symbol, to = ?to, %amount, "Minted");
        Ok(())
    }

    /// Sets (not increments) the allowance of `spender` over `owner`'s funds.
    pub fn approve(&self, owner: Address, spender: Address, amount: TokenAmount) -> AssetResult<()> {
        if spender.is_zero() {
            return Err(self.invalid_receiver());
        }
        self.state.write().allowances.insert((owner, spender), amount);
        Ok(())
    }

    fn move_funds(state: &mut AssetState, asset: &str, from: Address, to: Address, amount: TokenAmount) -> AssetResult<()> {
        let available = state.balance(&from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                asset: asset.to_string(),
                account: from,
                required: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }

        let credited = state
            .balance(&to)
            .checked_add(amount)
            .ok_or_else(|| AssetError::Overflow { asset: asset.to_string() })?;
        state.balances.insert(from, available - amount);
        state.balances.insert(to, credited);
        Ok(())
    }

    fn invalid_receiver(&self) -> AssetError {
        AssetError::InvalidReceiver { asset: self.symbol.clone() }
    }

    fn overflow(&self) -> AssetError {
        AssetError::Overflow { asset: self.symbol.clone() }
    }
}

impl FungibleAsset for InMemoryAsset {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u32 {
        self.decimals
    }

    fn balance_of(&self, account: Address) -> TokenAmount {
        self.state.read().balance(&account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> TokenAmount {
        self.state.read().allowance(&owner, &spender)
    }

    fn transfer(&self, sender: Address, to: Address, amount: TokenAmount) -> AssetResult<()> {
        if to.is_zero() {
            return Err(self.invalid_receiver());
        }
        let mut state = self.state.write();
        Self::move_funds(&mut state, &self.symbol, sender, to, amount)?;
        debug!(asset = %self.symbol, from = ?sender, to = ?to, %amount, "Transfer");
        Ok(())
    }

    fn transfer_from(&self, spender: Address, owner: Address, to: Address, amount: TokenAmount) -> AssetResult<()> {
        if to.is_zero() {
            return Err(self.invalid_receiver());
        }

        let mut state = self.state.write();
        let allowed = state.allowance(&owner, &spender);
        if allowed < amount {
            return Err(AssetError::InsufficientAllowance {
                asset: self.symbol.clone(),
                owner,
                spender,
                required: amount,
                available: allowed,
            });
        }

        Self::move_funds(&mut state, &self.symbol, owner, to, amount)?;
        state.allowances.insert((owner, spender), allowed - amount);
        debug!(asset = %self.symbol, spender = ?spender, from = ?owner, to = ?to, %amount, "TransferFrom");
        Ok(())
    }
}
