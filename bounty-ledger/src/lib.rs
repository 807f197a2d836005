//! Bounty marketplace ledger.
//!
//! Clients fund bounties in a transaction asset, a designated manager settles
//! each bounty by claim or refund, and claimed bounties pay an investment-asset
//! emission to their creator.

pub mod asset;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod services;

pub use asset::{AssetError, AssetHandle, FungibleAsset, InMemoryAsset};
pub use error::{ErrorCategory, LedgerError, LedgerResult};
pub use ledger::{BountyLedger, InitParams};
pub use models::{AssetKind, Bounty, LedgerConfig, ManagerList, PausePolicy};
