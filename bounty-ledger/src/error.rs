use serde::Serialize;
use shared::types::{Address, BountyId, BountyStatus, TokenAmount};
use thiserror::Error;

use crate::asset::AssetError;

/// Every distinguishable reason a ledger operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // Authorization
    #[error("Caller {caller:?} is not the owner")]
    NotOwner { caller: Address },

    #[error("Caller {caller:?} is not the manager of bounty {bounty_id}")]
    NotManager { bounty_id: BountyId, caller: Address },

    // State
    #[error("Bounty {0} does not exist")]
    BountyNotFound(BountyId),

    #[error("Bounty {0} has already been claimed")]
    AlreadyClaimed(BountyId),

    #[error("Bounty {bounty_id} is not active (status: {status})")]
    NotActive { bounty_id: BountyId, status: BountyStatus },

    // Validation
    #[error("Reward must be greater than zero")]
    NotEnoughReward,

    #[error("Emission rate must be greater than zero")]
    NotEnoughEmission,

    #[error("Manager {manager:?} is not whitelisted")]
    NotValidManager { manager: Address },

    #[error("Manager {manager:?} holds {available}, minimum is {required}")]
    NotEnoughManagerHolding {
        manager: Address,
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("Allowance {available} is below required {required}")]
    NotEnoughAllowance { required: TokenAmount, available: TokenAmount },

    #[error("Client balance {available} is below required {required}")]
    NotEnoughClientHolding { required: TokenAmount, available: TokenAmount },

    #[error("Ledger custody of {asset} is {available}, settlement needs {required}")]
    InsufficientCustody {
        asset: String,
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("Invalid address for {0}")]
    InvalidAddress(&'static str),

    #[error("At most {max} managers allowed, got {count}")]
    TooManyManagers { count: usize, max: usize },

    #[error("Reward plus commission overflows")]
    AmountOverflow,

    #[error("Emission for reward {reward} does not fit in 256 bits")]
    EmissionOverflow { reward: TokenAmount },

    // Lifecycle
    #[error("Ledger is already initialized")]
    AlreadyInitialized,

    #[error("Ledger is not initialized")]
    NotInitialized,

    #[error("Ledger is paused")]
    ContractPaused,

    // External
    #[error("Asset transfer failed: {0}")]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Authorization,
    State,
    Validation,
    Lifecycle,
    External,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::State => "state",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Lifecycle => "lifecycle",
            ErrorCategory::External => "external",
        };
        f.write_str(name)
    }
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::NotOwner { .. } | LedgerError::NotManager { .. } => ErrorCategory::Authorization,

            LedgerError::BountyNotFound(_) | LedgerError::AlreadyClaimed(_) | LedgerError::NotActive { .. } => {
                ErrorCategory::State
            }

            LedgerError::NotEnoughReward
            | LedgerError::NotEnoughEmission
            | LedgerError::NotValidManager { .. }
            | LedgerError::NotEnoughManagerHolding { .. }
            | LedgerError::NotEnoughAllowance { .. }
            | LedgerError::NotEnoughClientHolding { .. }
            | LedgerError::InsufficientCustody { .. }
            | LedgerError::InvalidAddress(_)
            | LedgerError::TooManyManagers { .. }
            | LedgerError::AmountOverflow
            | LedgerError::EmissionOverflow { .. } => ErrorCategory::Validation,

            LedgerError::AlreadyInitialized | LedgerError::NotInitialized | LedgerError::ContractPaused => {
                ErrorCategory::Lifecycle
            }

            LedgerError::Asset(_) => ErrorCategory::External,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotOwner { .. } => "NOT_OWNER",
            LedgerError::NotManager { .. } => "NOT_MANAGER",
            LedgerError::BountyNotFound(_) => "BOUNTY_NOT_FOUND",
            LedgerError::AlreadyClaimed(_) => "ALREADY_CLAIMED",
            LedgerError::NotActive { .. } => "NOT_ACTIVE",
            LedgerError::NotEnoughReward => "NOT_ENOUGH_REWARD",
            LedgerError::NotEnoughEmission => "NOT_ENOUGH_EMISSION",
            LedgerError::NotValidManager { .. } => "NOT_VALID_MANAGER",
            LedgerError::NotEnoughManagerHolding { .. } => "NOT_ENOUGH_MANAGER_HOLDING",
            LedgerError::NotEnoughAllowance { .. } => "NOT_ENOUGH_ALLOWANCE",
            LedgerError::NotEnoughClientHolding { .. } => "NOT_ENOUGH_CLIENT_HOLDING",
            LedgerError::InsufficientCustody { .. } => "INSUFFICIENT_CUSTODY",
            LedgerError::InvalidAddress(_) => "INVALID_ADDRESS",
            LedgerError::TooManyManagers { .. } => "TOO_MANY_MANAGERS",
            LedgerError::AmountOverflow => "AMOUNT_OVERFLOW",
            LedgerError::EmissionOverflow { .. } => "EMISSION_OVERFLOW",
            LedgerError::AlreadyInitialized => "ALREADY_INITIALIZED",
            LedgerError::NotInitialized => "NOT_INITIALIZED",
            LedgerError::ContractPaused => "CONTRACT_PAUSED",
            LedgerError::Asset(_) => "ASSET_TRANSFER_FAILED",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            LedgerError::BountyNotFound(_) => 404,
            LedgerError::NotInitialized => 503,
            _ => match self.category() {
                ErrorCategory::Authorization => 403,
                ErrorCategory::State | ErrorCategory::Lifecycle => 409,
                ErrorCategory::Validation => 422,
                ErrorCategory::External => 502,
            },
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::U256;

    #[test]
    fn test_categories() {
        assert_eq!(
            LedgerError::NotOwner { caller: Address::zero() }.category(),
            ErrorCategory::Authorization
        );
        assert_eq!(LedgerError::AlreadyClaimed(1).category(), ErrorCategory::State);
        assert_eq!(LedgerError::NotEnoughEmission.category(), ErrorCategory::Validation);
        assert_eq!(LedgerError::ContractPaused.category(), ErrorCategory::Lifecycle);
        assert_eq!(
            LedgerError::from(AssetError::InvalidReceiver { asset: "TT".to_string() }).category(),
            ErrorCategory::External
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NotOwner { caller: Address::zero() }.http_status_code(), 403);
        assert_eq!(LedgerError::BountyNotFound(7).http_status_code(), 404);
        assert_eq!(
            LedgerError::NotActive { bounty_id: 0, status: BountyStatus::Refunded }.http_status_code(),
            409
        );
        assert_eq!(LedgerError::NotEnoughReward.http_status_code(), 422);
        assert_eq!(LedgerError::AlreadyInitialized.http_status_code(), 409);
        assert_eq!(LedgerError::NotInitialized.http_status_code(), 503);
        assert_eq!(
            LedgerError::Asset(AssetError::Overflow { asset: "TT".to_string() }).http_status_code(),
            502
        );
    }

    #[test]
    fn test_codes_and_messages() {
        let err = LedgerError::NotEnoughAllowance { required: U256::from(10u64), available: U256::from(3u64) };
        assert_eq!(err.code(), "NOT_ENOUGH_ALLOWANCE");
        assert_eq!(err.to_string(), "Allowance 3 is below required 10");
        assert_eq!(ErrorCategory::Lifecycle.to_string(), "lifecycle");
    }
}
