//! Shared type definitions for the bounty ledger
//!
//! - Core identifier and amount types (`BountyId`, `Address`, `TokenAmount`)
//! - Bounty lifecycle status
//! - API response envelope
//! - Common error kinds

pub mod bounty;
pub mod common;
pub mod error;

pub use bounty::BountyStatus;
pub use common::{
    parse_address, parse_token_amount, scale_factor, Address, ApiError, ApiResponse,
    BountyId, TokenAmount, EMISSION_RATE_DECIMALS, MANAGER_SLOTS, U256,
};
pub use error::CommonError;

pub type Result<T> = std::result::Result<T, CommonError>;
