/// Shared bounty-related type definitions
use serde::{Deserialize, Serialize};

use super::error::CommonError;

/// Bounty lifecycle status. `Claimed` and `Refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BountyStatus {
    Active,
    Claimed,
    Refunded,
}

impl Default for BountyStatus {
    fn default() -> Self {
        BountyStatus::Active
    }
}

impl BountyStatus {
    /// Only `Active -> Claimed` and `Active -> Refunded` are permitted.
    pub fn can_transition_to(&self, next: BountyStatus) -> bool {
        matches!(
            (self, next),
            (BountyStatus::Active, BountyStatus::Claimed) | (BountyStatus::Active, BountyStatus::Refunded)
        )
    }

    pub fn transition_to(self, next: BountyStatus) -> Result<BountyStatus, CommonError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommonError::InvalidTransition(format!("{} -> {}", self, next)))
        }
    }
}

impl std::fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BountyStatus::Active => write!(f, "active"),
            BountyStatus::Claimed => write!(f, "claimed"),
            BountyStatus::Refunded => write!(f, "refunded"),
        }
    }
}
